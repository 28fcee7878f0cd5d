use plyview::{App, MeshSource};

fn main() -> plyview::Result<()> {
    env_logger::init();

    let Some(arg) = std::env::args().nth(1) else {
        eprintln!("Usage: plyview <path-or-url-to.ply>");
        std::process::exit(2);
    };
    let source = MeshSource::parse(&arg);

    App::new()
        .with_title(format!("plyview - {}", source.filename()))
        .with_source(source)
        .run()
}
