use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    takken_quiz::example_apps::run_quiz_demo(std::env::args().skip(1))
}
