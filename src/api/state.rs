use crate::ranking::Leaderboard;

#[derive(Clone)]
pub struct AppState {
    pub leaderboard: Leaderboard,
}
