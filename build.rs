fn main() {
    // Generates OUT_DIR/program/rule.rs from src/program/rule.lalrpop
    lalrpop::process_root().unwrap();

    println!("cargo:rerun-if-changed=src/program/rule.lalrpop");
}
