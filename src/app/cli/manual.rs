//! Manual setup instructions.

use crate::app::api::{self, ManualRequest};
use crate::domain::AppError;

const RULE: &str = "----------------------------------------";

pub fn run_manual(request: &ManualRequest) -> Result<(), AppError> {
    let steps = api::manual(request)?;

    println!("Manual setup for target {}", steps.target);
    println!();
    println!("1. Open the project, select target '{}', then Build Phases", steps.target);
    println!("2. Add a New Run Script Phase named: {}", steps.phase_name);
    match &steps.after {
        Some(after) => println!("3. Move it right after '{}' ({})", after, steps.placement),
        None => println!("3. Move it to the top of the list ({})", steps.placement),
    }
    println!("4. Paste the script:");
    println!("{}", RULE);
    print!("{}", steps.body);
    println!("{}", RULE);
    println!();
    println!("SRCROOT = {}", steps.project_root.display());
    println!("Scripts directory = {}", steps.scripts_path);
    Ok(())
}
