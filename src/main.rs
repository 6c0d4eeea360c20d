//! Entry point: wires up logging and hands stdin to the UCI driver.

use std::io;

use engine::uci::Engine;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let mut engine = Engine::new();
    engine.run(io::stdin().lock());
}
