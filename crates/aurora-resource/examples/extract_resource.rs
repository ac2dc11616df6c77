//! Extract one resource to a file, bytes verbatim.
//!
//! Usage: extract_resource <game-root> <name> <extension>

use aurora_formats::ResourceType;
use aurora_resource::{GameVersion, ResourceId, ResourceLayout};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let (Some(root), Some(name), Some(ext)) = (args.next(), args.next(), args.next()) else {
        return Err("usage: extract_resource <game-root> <name> <extension>".into());
    };
    let res_type =
        ResourceType::from_extension(&ext.to_lowercase()).ok_or("unknown extension")?;

    let layout = ResourceLayout::index(GameVersion::Kotor, root.as_ref())?;
    let id = ResourceId::new(&name, res_type);
    match layout.resources().get(&id)? {
        Some(data) => {
            let out = format!("{id}");
            std::fs::write(&out, &data)?;
            println!("wrote {} bytes to {out}", data.len());
        }
        None => println!("not found: {id}"),
    }
    Ok(())
}
