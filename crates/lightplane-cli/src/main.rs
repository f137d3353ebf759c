mod command;
mod logging;
mod model;
mod record;
mod ui;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
