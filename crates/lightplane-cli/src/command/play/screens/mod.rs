pub(crate) use self::{game::GameScene, game_over::GameOverScene, launcher::LauncherScene};

mod game;
mod game_over;
mod launcher;
