mod app;
mod net;

fn main() -> anyhow::Result<()> {
    app::run()
}
