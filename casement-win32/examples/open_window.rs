//! Opens a window and pumps messages until the window is closed.

#[cfg(windows)]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use casement_core::context::Context;
    use casement_core::os::PumpMode;
    use casement_core::window::{AspectRatio, WindowAttributes};
    use casement_win32::Win32Api;

    tracing_subscriber::fmt::init();

    let mut context = Context::new(Box::new(Win32Api::new()))?;
    for monitor in context.monitors()? {
        println!("{}: {:?}", monitor.name(), monitor.current_video_mode());
    }

    let window = context.create_window(
        WindowAttributes::default()
            .with_title("casement")
            .with_aspect_ratio(Some(AspectRatio { numer: 16, denom: 9 })),
    )?;
    println!("created {:?}", context.window(window)?.handle());

    loop {
        context.pump_events(PumpMode::Wait)?;
    }
}

#[cfg(not(windows))]
fn main() {
    eprintln!("this example only runs on Windows");
}
