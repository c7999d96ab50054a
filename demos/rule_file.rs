//! Example: Reading and minimizing a rule file
//!
//! This example writes a small logic program to a temporary file, reads it
//! back, minimizes it and checks the result for strong equivalence.

use htmin::verify::strongly_equivalent;
use htmin::{Minimizable, Program};
use std::io::Write;
use tempfile::NamedTempFile;

fn main() -> std::io::Result<()> {
    println!("=== Rule File Minimization Example ===\n");

    let rules = r#"% a small program
/abc/
a :- b, c.
a :- not b, c.
a ; not a :- c.
b :- b, not c.
"#;

    println!("Sample program:");
    println!("{}", rules);

    let mut temp = NamedTempFile::new()?;
    temp.write_all(rules.as_bytes())?;
    temp.flush()?;

    let program = Program::from_file(temp.path())?;
    println!("Read {} rules over {} atoms", program.len(), program.width());
    for dropped in program.dropped() {
        println!("  dropped line {}: {} ({})", dropped.line, dropped.text, dropped.reason);
    }

    let minimized = program.minimize()?;
    println!("\nMinimized program:");
    println!("{}", minimized.to_rules());

    let ok = strongly_equivalent(program.keys(), minimized.keys());
    println!("\n[STRONG EQ TEST] {}", if ok { "OK" } else { "ERROR" });

    Ok(())
}
