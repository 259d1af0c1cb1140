use std::error::Error;
use std::path::PathBuf;

use bounce_light::{BounceSettings, BounceVisibility, VisApprox, make_bounce_lights};
use clap::{Parser, ValueEnum};

mod scene;

use scene::Scene;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum VisApproxArg {
    None,
    Vis,
    Rays,
}

impl From<VisApproxArg> for VisApprox {
    fn from(v: VisApproxArg) -> Self {
        match v {
            VisApproxArg::None => VisApprox::None,
            VisApproxArg::Vis => VisApprox::Vis,
            VisApproxArg::Rays => VisApprox::Rays,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "bounce-bake")]
#[command(about = "Builds bounce lights for a level scene", long_about = None)]
struct Args {
    /// Scene file (TOML)
    scene: PathBuf,

    /// Bounce settings file (TOML); flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Worker threads, 0 for one per core
    #[arg(long)]
    threads: Option<usize>,

    /// Texture tint, 0 = gray bounce, 1 = full texture color
    #[arg(long)]
    color_scale: Option<f32>,

    #[arg(long, value_enum)]
    visapprox: Option<VisApproxArg>,

    /// Print one line per bounce light
    #[arg(long)]
    list: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn load_settings(args: &Args) -> Result<BounceSettings, Box<dyn Error>> {
    let mut settings = match &args.config {
        Some(path) => BounceSettings::from_path(path)?,
        None => BounceSettings::default(),
    };
    if let Some(t) = args.threads {
        settings.threads = t;
    }
    if let Some(c) = args.color_scale {
        settings.color_scale = c;
    }
    if let Some(v) = args.visapprox {
        settings.visapprox = v.into();
    }
    settings.validate()?;
    Ok(settings)
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let settings = load_settings(&args)?;
    log::debug!("settings: {:?}", settings);
    let scene = Scene::from_path(&args.scene)?;
    log::info!(
        "loaded {} ({} faces, {} lights)",
        args.scene.display(),
        scene.level.faces.len(),
        scene.lights.len()
    );

    let lights = make_bounce_lights(&scene.level, &settings, &scene, &scene, &scene)?;

    if args.list {
        let mut order: Vec<usize> = (0..lights.len()).collect();
        order.sort_by_key(|&i| lights.lights()[i].face);
        for i in order {
            let l = &lights.lights()[i];
            let mut line = format!(
                "face {:>5}  pos ({:.1}, {:.1}, {:.1})  area {:.1}",
                l.face, l.pos.x, l.pos.y, l.pos.z, l.area
            );
            for (style, c) in &l.color_by_style {
                line.push_str(&format!("  style {}: ({:.4}, {:.4}, {:.4})", style, c.x, c.y, c.z));
            }
            match l.visibility {
                BounceVisibility::None => {}
                BounceVisibility::Leaf(leaf) => line.push_str(&format!("  leaf {:?}", leaf)),
                BounceVisibility::Bounds(b) => {
                    let (mn, mx) = (b.mins(), b.maxs());
                    line.push_str(&format!(
                        "  vis ({:.0}, {:.0}, {:.0})..({:.0}, {:.0}, {:.0})",
                        mn.x, mn.y, mn.z, mx.x, mx.y, mx.z
                    ));
                }
            }
            println!("{}", line);
        }
    }

    println!(
        "{} bounce lights from {} faces, {:.1} units^2 emitting",
        lights.len(),
        scene.level.faces.len(),
        lights.total_area()
    );
    Ok(())
}
