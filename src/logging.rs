/// Initialises log4rs from `path`, or env_logger when that fails.
pub fn init(path: &str) {
    if let Err(e) = log4rs::init_file(path, Default::default()) {
        env_logger::init();
        log::warn!("cannot load {}, logging through env_logger: {}", path, e);
    }
}
