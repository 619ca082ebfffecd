//! The `iaprof catalog` command.

use anyhow::Result;

use iaprof_core::catalog::{BOARDS, COURSES};

pub fn execute() -> Result<()> {
    println!("Cursos:");
    for course in COURSES {
        println!("  {course}");
    }
    println!("\nBancas:");
    for board in BOARDS {
        println!("  {board}");
    }
    println!("\nENEM não usa banca; outros cursos aceitam qualquer nome além destes.");
    Ok(())
}
