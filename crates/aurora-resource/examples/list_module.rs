//! List the resources one module brings into scope.
//!
//! Usage: list_module <game-root> <module-name>

use aurora_resource::{GameVersion, ResourceLayout};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let root = args.next().ok_or("usage: list_module <game-root> <module-name>")?;
    let module = args.next().ok_or("usage: list_module <game-root> <module-name>")?;

    let layout = ResourceLayout::index(GameVersion::Kotor, root.as_ref())?;
    println!("modules available: {}", layout.module_names().join(", "));

    layout.load_module(&module)?;
    for id in layout.resources().resource_ids() {
        println!("{id}");
    }
    Ok(())
}
