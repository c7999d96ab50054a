//! Basic minimization example

use htmin::Minimizer;

fn main() -> Result<(), htmin::MinimizationError> {
    println!("Here-and-There Minimization Example\n");

    println!("Four valuations over three atoms x0 x1 x2:");
    let labels = ["020", "120", "001", "021"];
    for label in &labels {
        println!("  {}", label);
    }

    println!("\nComputing prime implicants and a minimum cover...");
    let report = Minimizer::new().run_labels(&labels)?;

    println!("\n{} primes, {} essential", report.primes.len(), report.essentials.len());
    for (i, solution) in report.solutions.iter().enumerate() {
        println!("\nMINIMAL SOLUTION #{} ({} literals)", i + 1, solution.literal_count);
        println!("{}", solution.to_rules());
    }

    Ok(())
}
