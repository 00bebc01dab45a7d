use globus_viewer::Viewer;

fn main() {
    // Startup banner, printed before the window opens.
    println!();
    println!("  ╔════════════════════════════════════════╗");
    println!("  ║                 GLOBUS                 ║");
    println!("  ║   wgpu renderer  ·  point-light globe  ║");
    println!("  ╠════════════════════════════════════════╣");
    println!("  ║  drag          rotate globe            ║");
    println!("  ║  wheel  + -    zoom in / out           ║");
    println!("  ║  R             reset view              ║");
    println!("  ║  T             reload texture          ║");
    println!("  ║  L             toggle lighting         ║");
    println!("  ║  S             toggle shadows          ║");
    println!("  ║  [ ]           shadow intensity        ║");
    println!("  ║  N P  0-7      light presets           ║");
    println!("  ║  I             print light info        ║");
    println!("  ║  Esc           quit                    ║");
    println!("  ╚════════════════════════════════════════╝");
    println!();

    if let Err(e) = Viewer::new().title("Globus").asset_dir(".").run() {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}
