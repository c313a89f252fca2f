use phoenix::app::App;
use phoenix::showcase::{Showcase, ShowcaseConfig};

fn main() -> phoenix::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ShowcaseConfig::default();
    let root = config.asset_root.clone();

    App::new()
        .with_title("Phoenix Showcase")
        .with_asset_root(root)
        .run_with(move |engine, window| {
            let size = window.inner_size();
            Showcase::new(config, engine, size.width, size.height)
        })
}
