// Engine modules: assets, game loop, input, renderer

pub mod assets;
pub mod game_loop;
pub mod input;
pub mod renderer;
