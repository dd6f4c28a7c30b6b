//! `mirrormind modes` — Print the mode table.

use mirrormind_core::mode::RecursionMode;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("\u{1F52E} Available thinking modes");
    println!("==========================");
    for mode in RecursionMode::ALL {
        println!(
            "  {:<14} temp {:<5} {}",
            mode.as_str(),
            mode.temperature(),
            mode.description()
        );
    }
    Ok(())
}
