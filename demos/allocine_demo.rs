use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    allocine::example_apps::run_allocine_demo(std::env::args().skip(1))
}
