use std::sync::atomic::{AtomicBool, Ordering};

use tripmock::{core, signals, status::ExitStatus};

/// Entry point - catches Ctrl+C and calls core::run()
fn main() -> ExitStatus {
    // The handler only sets a flag so in-flight work can wind down
    ctrlc::set_handler(move || {
        signals::set_interrupted();
        eprintln!("\nInterrupted");

        // Second Ctrl+C exits immediately
        static SECOND_CTRL_C: AtomicBool = AtomicBool::new(false);
        if SECOND_CTRL_C.swap(true, Ordering::SeqCst) {
            std::process::exit(ExitStatus::Interrupted as i32);
        }
    })
    .ok();

    let args: Vec<String> = std::env::args().collect();
    let status = core::run(args);

    if signals::was_interrupted() {
        return ExitStatus::Interrupted;
    }

    status
}
