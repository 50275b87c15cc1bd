use anyhow::Result;

fn main() -> Result<()> {
    env_logger::init();
    let args = beancount_import_zenmoney::args::parse();
    beancount_import_zenmoney::cli::main(args)
}
