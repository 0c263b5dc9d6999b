use boundary_simplify::render::{self, Bounds, Projection, Viewport};
use boundary_simplify::{process_reader, Config, Format, Processed};
use std::error::Error;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use structopt::StructOpt;
use tracing::{debug, info, Level};

#[derive(StructOpt, Debug)]
#[structopt(
    name = "boundary_simplify",
    about = "Dissolve administrative boundaries by region and simplify their outlines"
)]
struct Opt {
    /// GeoJSON FeatureCollection to read
    #[structopt(parse(from_os_str))]
    input: PathBuf,

    /// Where to write the result, stdout if omitted
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,

    /// Maximum distance of a removed vertex from the simplified outline,
    /// in coordinate units
    #[structopt(short, long, default_value = "0.01")]
    tolerance: f64,

    /// Simplify every feature on its own instead of merging regions first
    #[structopt(long)]
    no_dissolve: bool,

    /// Comma separated property fields naming a feature's region, first
    /// match wins [default: N03_001,name]
    #[structopt(long, use_delimiter = true)]
    key_fields: Vec<String>,

    /// Property to store the region name in on dissolved features
    #[structopt(long, default_value = "name")]
    output_key: String,

    /// Simplify features in parallel
    #[structopt(short, long)]
    parallel: bool,

    /// Output format: geojson, pretty or lines
    #[structopt(short, long, default_value = "geojson")]
    format: Format,

    /// Also render the result as SVG to this file
    #[structopt(long, parse(from_os_str))]
    svg: Option<PathBuf>,

    /// Fit the SVG to the data instead of the fixed Japan frame
    #[structopt(long)]
    fit: bool,

    /// SVG width in pixels
    #[structopt(long, default_value = "450")]
    width: f64,

    /// SVG height in pixels
    #[structopt(long, default_value = "500")]
    height: f64,

    /// More log output, repeat for even more
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,
}

impl Opt {
    fn config(&self) -> Config {
        let defaults = Config::default();
        let key_fields = if self.key_fields.is_empty() {
            defaults.key_fields
        } else {
            self.key_fields.clone()
        };
        Config {
            tolerance: self.tolerance,
            dissolve: !self.no_dissolve,
            key_fields,
            output_key: self.output_key.clone(),
            parallel: self.parallel,
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let opt = Opt::from_args();
    init_logging(opt.verbose);

    let config = opt.config();
    debug!(?config, input = %opt.input.display(), "starting");

    let file = File::open(&opt.input)?;
    let reader = BufReader::new(file);
    let Processed { collection, .. } = match &opt.output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            let processed = process_reader(reader, &mut writer, &config, opt.format)?;
            writer.flush()?;
            info!(path = %path.display(), "wrote output");
            processed
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            process_reader(reader, &mut writer, &config, opt.format)?
        }
    };

    if let Some(path) = &opt.svg {
        let bounds = if opt.fit {
            Bounds::of(&collection).ok_or("nothing to render")?
        } else {
            render::JAPAN
        };
        let viewport = Viewport {
            width: opt.width,
            height: opt.height,
        };
        let projection = Projection::new(bounds, viewport)?;
        let mut writer = BufWriter::new(File::create(path)?);
        render::write_svg(&collection, &projection, &config.output_key, &mut writer)?;
        writer.flush()?;
        info!(path = %path.display(), "wrote svg");
    }
    Ok(())
}
