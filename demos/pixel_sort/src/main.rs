use argh::FromArgs;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::path::{Path, PathBuf};

use pixelsort::engine::{self, BlendMode, PixelSortConfig, SortOptions};
use pixelsort::image::{Image, ImageSize};
use pixelsort::imgproc;

#[derive(FromArgs)]
/// Glitch images by sorting their pixels
struct Args {
    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Sort(SortArgs),
    Shift(ShiftArgs),
}

#[derive(FromArgs)]
/// Sort runs of pixels by hue, saturation or value
#[argh(subcommand, name = "sort")]
struct SortArgs {
    /// path to an input image
    #[argh(option, short = 'i')]
    input: PathBuf,

    /// path to the output image
    #[argh(option, short = 'o')]
    output: PathBuf,

    /// channel to sort by: hue, saturation or value
    #[argh(option, default = "String::from(\"hue\")")]
    sort_field: String,

    /// sort in descending order
    #[argh(switch)]
    flipped: bool,

    /// blend mode compositing the sorted image over the original
    #[argh(option, default = "String::from(\"none\")")]
    mode: String,

    /// leave every n-th row untouched
    #[argh(option)]
    skip_interval: Option<i64>,

    /// leave each row untouched with this probability
    #[argh(option)]
    skip_probability: Option<f64>,

    /// minimum region length, as a fraction of the sorted span
    #[argh(option, default = "0.1")]
    region_min: f64,

    /// maximum region length, as a fraction of the sorted span
    #[argh(option, default = "0.3")]
    region_max: f64,

    /// sort every span as a single region
    #[argh(switch)]
    no_partition: bool,

    /// seed of the random generators
    #[argh(option)]
    seed: Option<u64>,

    /// number of worker threads
    #[argh(option)]
    threads: Option<usize>,

    /// only sort the detected foreground of the image
    #[argh(switch)]
    foreground: bool,

    /// amplitude of the uniform noise added before sorting
    #[argh(option, default = "0")]
    noise: u8,

    /// sort columns instead of rows
    #[argh(switch)]
    vertical: bool,
}

#[derive(FromArgs)]
/// Shift one color channel horizontally and blend it back
#[argh(subcommand, name = "shift")]
struct ShiftArgs {
    /// path to an input image
    #[argh(option, short = 'i')]
    input: PathBuf,

    /// path to the output image
    #[argh(option, short = 'o')]
    output: PathBuf,

    /// shift as a fraction of the width, negative shifts left
    #[argh(option, default = "-0.1")]
    percent: f32,

    /// index of the shifted channel: 0, 1 or 2
    #[argh(option, default = "0")]
    channel: usize,

    /// blend mode compositing the shifted image over the original
    #[argh(option, default = "String::from(\"none\")")]
    mode: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Args = argh::from_env();

    match args.command {
        Command::Sort(args) => sort(args),
        Command::Shift(args) => shift(args),
    }
}

fn sort(args: SortArgs) -> Result<(), Box<dyn std::error::Error>> {
    let options = SortOptions {
        flipped: args.flipped,
        mode: args.mode,
        skip_interval: args.skip_interval,
        skip_probability: args.skip_probability,
        partition: !args.no_partition,
        region_min: args.region_min,
        region_max: args.region_max,
        seed: args.seed,
        threads: args.threads,
        ..SortOptions::new(args.sort_field)
    };
    let config = PixelSortConfig::try_from(&options)?;

    let input = image::open(&args.input)?;
    let (mut rgb, mut alpha) = if input.color().has_alpha() {
        let rgba = input.to_rgba8();
        let size = ImageSize {
            width: rgba.width() as usize,
            height: rgba.height() as usize,
        };
        let rgba = Image::<u8, 4>::new(size, rgba.into_raw())?;

        let mut rgb = Image::<u8, 3>::from_size_val(size, 0)?;
        imgproc::color::rgb_from_rgba(&rgba, &mut rgb)?;
        let mut alpha = Image::<u8, 1>::from_size_val(size, 0)?;
        imgproc::color::alpha_from_rgba(&rgba, &mut alpha)?;
        (rgb, Some(alpha))
    } else {
        let rgb8 = input.to_rgb8();
        let size = ImageSize {
            width: rgb8.width() as usize,
            height: rgb8.height() as usize,
        };
        (Image::<u8, 3>::new(size, rgb8.into_raw())?, None)
    };
    log::info!("loaded {} ({})", args.input.display(), rgb.size());

    if args.noise > 0 {
        let mut rng = match args.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::rng().random()),
        };
        let mut noisy = Image::<u8, 3>::from_size_val(rgb.size(), 0)?;
        imgproc::noise::add_uniform_noise(&rgb, &mut noisy, args.noise, &mut rng)?;
        rgb = noisy;
    }

    if args.vertical {
        rgb = rgb.transposed();
        alpha = alpha.map(|a| a.transposed());
    }

    let mut sorted = if args.foreground {
        engine::pixel_sort_foreground(&rgb, &config)?
    } else {
        engine::pixel_sort(&rgb, alpha.as_ref(), &config)?
    };

    if args.vertical {
        sorted = sorted.transposed();
    }

    save_rgb(&sorted, &args.output)?;
    log::info!("saved {}", args.output.display());

    Ok(())
}

fn shift(args: ShiftArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mode = args.mode.parse::<BlendMode>()?;

    let rgb8 = image::open(&args.input)?.to_rgb8();
    let size = ImageSize {
        width: rgb8.width() as usize,
        height: rgb8.height() as usize,
    };
    let src = Image::<u8, 3>::new(size, rgb8.into_raw())?;

    let shifted = imgproc::shift::channel_shift(&src, args.percent, args.channel, mode)?;

    save_rgb(&shifted, &args.output)?;
    log::info!("saved {}", args.output.display());

    Ok(())
}

fn save_rgb(image: &Image<u8, 3>, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let [width, height]: [u32; 2] = image.size().into();
    let buffer = image::RgbImage::from_raw(width, height, image.as_slice().to_vec())
        .ok_or("output buffer does not match the image size")?;
    buffer.save(path)?;
    Ok(())
}
