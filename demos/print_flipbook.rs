//! Turn a GIF into printable flipbook sheets.
//!
//! Usage:
//!   cargo run --example print_flipbook -- <input.gif> [output_dir]

use std::error::Error;

use flipbook::{AcceptedContainer, SheetOptions};

fn main() -> Result<(), Box<dyn Error>> {
    let input_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "animation.gif".to_string());
    let output_dir = std::env::args()
        .nth(2)
        .unwrap_or_else(|| "flipbook_out".to_string());

    println!("Opening {input_path}...");
    let decoded = AcceptedContainer::open(&input_path)?.decode()?;
    print!("{}", decoded.validate());

    let flipbook = decoded.composite()?;
    println!(
        "Composited {} frames at {}x{}",
        flipbook.len(),
        flipbook.screen().width,
        flipbook.screen().height,
    );

    let frames = flipbook.save_frames(format!("{output_dir}/frames"))?;
    println!("Saved {} frames", frames.len());

    let options = SheetOptions::new(3, 4).with_cell_width(300);
    let sheets = flipbook.save_sheets(format!("{output_dir}/sheets"), &options)?;
    println!("Saved {} sheets to {output_dir}/sheets", sheets.len());

    Ok(())
}
