use collision::{config::CollisionConfig, Collider, CollisionSystem, ImageSource, PixelSource};
use std::{
    fmt,
    path::{Path, PathBuf},
    process::ExitCode,
};

const USAGE: &str =
    "usage: pixel_collider <image_a> <x> <y> <image_b> <x> <y> [--anchor <ax> <ay>] [--dump-masks]";

#[derive(Debug)]
struct Args {
    sprites: [SpriteArg; 2],
    anchor: glam::Vec2,
    dump_masks: bool,
}

#[derive(Debug)]
struct SpriteArg {
    path: PathBuf,
    pos: glam::Vec2,
}

#[derive(Debug)]
enum DemoError {
    Usage(String),
    Config(collision::config::ConfigError),
    Source(collision::source::SourceError),
    Json(serde_json::Error),
}

impl fmt::Display for DemoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DemoError::Usage(e) => write!(f, "{}\n{}", e, USAGE),
            DemoError::Config(e) => write!(f, "{}", e),
            DemoError::Source(e) => write!(f, "{}", e),
            DemoError::Json(e) => write!(f, "could not serialize mask: {}", e),
        }
    }
}

fn init_logging() {
    // the logger can only be set once per process, nothing to recover if it fails
    let _ = simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .env()
        .init();
}

fn init_config() -> Result<CollisionConfig, DemoError> {
    CollisionConfig::from_file(Path::new("config.ini")).map_err(DemoError::Config)
}

fn parse_f32(value: Option<&String>, name: &str) -> Result<f32, DemoError> {
    let value = value.ok_or_else(|| DemoError::Usage(format!("missing {}", name)))?;
    value
        .parse::<f32>()
        .map_err(|_| DemoError::Usage(format!("{} must be a number, got \"{}\"", name, value)))
}

fn parse_args(args: &[String]) -> Result<Args, DemoError> {
    let mut positional = Vec::new();
    let mut anchor = glam::Vec2::ZERO;
    let mut dump_masks = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--anchor" => {
                let x = parse_f32(iter.next(), "anchor x")?;
                let y = parse_f32(iter.next(), "anchor y")?;
                anchor = glam::Vec2::new(x, y);
            }
            "--dump-masks" => dump_masks = true,
            _ => positional.push(arg),
        }
    }

    if positional.len() != 6 {
        return Err(DemoError::Usage(format!(
            "expected 6 positional arguments, got {}",
            positional.len()
        )));
    }

    let sprite = |offset: usize| -> Result<SpriteArg, DemoError> {
        Ok(SpriteArg {
            path: PathBuf::from(positional[offset]),
            pos: glam::Vec2::new(
                parse_f32(Some(positional[offset + 1]), "x")?,
                parse_f32(Some(positional[offset + 2]), "y")?,
            ),
        })
    };

    Ok(Args {
        sprites: [sprite(0)?, sprite(3)?],
        anchor,
        dump_masks,
    })
}

fn place(
    system: &mut CollisionSystem,
    use_caching: bool,
    sprite: &SpriteArg,
    anchor: glam::Vec2,
) -> Result<Collider, DemoError> {
    let source = ImageSource::open(&sprite.path).map_err(DemoError::Source)?;
    let mut collider = if use_caching {
        system.collider(&source)
    } else {
        system.collider_uncached(&source)
    };
    collider.set_anchor(anchor.x, anchor.y);
    collider.set_pos(sprite.pos.x, sprite.pos.y);
    log::info!(
        "Placed \"{}\" ({}x{}) at {:?}",
        sprite.path.display(),
        source.dimension().width,
        source.dimension().height,
        collider.origin().unwrap_or_default()
    );
    Ok(collider)
}

fn run() -> Result<bool, DemoError> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_args(&args)?;
    let config = init_config()?;

    let mut system = CollisionSystem::from_config(&config);
    let [first, second] = &args.sprites;
    let a = place(&mut system, config.use_caching, first, args.anchor)?;
    let b = place(&mut system, config.use_caching, second, args.anchor)?;

    if args.dump_masks {
        for collider in [&a, &b] {
            let json = serde_json::to_string(collider.mask().as_ref()).map_err(DemoError::Json)?;
            println!("{}", json);
        }
    }

    Ok(a.test(&b))
}

fn main() -> ExitCode {
    /* Initialize */
    init_logging();

    match run() {
        Ok(overlap) => {
            log::info!("Overlap test finished");
            println!("{}", if overlap { "overlap" } else { "no overlap" });
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
