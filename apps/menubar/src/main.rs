fn main() {
    if let Err(e) = audioswitch_menubar_lib::run() {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}
