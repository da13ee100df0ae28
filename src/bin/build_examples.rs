use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    article_windows::apps::run_build_examples(std::env::args().skip(1))
}
