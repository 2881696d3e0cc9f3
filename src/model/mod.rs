pub mod dart;
pub mod event_result;
pub mod game_save;
pub mod player;
pub mod seat;
