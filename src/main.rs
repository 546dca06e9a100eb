mod anim;
mod app;
mod assets;
mod audio;
mod demo;
mod input;
mod render;

fn main() {
    env_logger::init();
    log::info!("dashcat starting up");

    if let Err(e) = app::run() {
        log::error!("Fatal error: {e}");
        std::process::exit(1);
    }
}
