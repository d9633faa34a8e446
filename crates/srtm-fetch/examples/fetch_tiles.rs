//! Example: list the SRTM archives covering a bounding box and optionally fetch them.
//!
//! Usage: cargo run --example fetch_tiles -- <ll_lat> <ll_lon> <ur_lat> <ur_lon> [product] [outdir]

use rsflow_common::{ProcessRunner, ProgressCallback, ProgressEvent};
use srtm_fetch::{BoundingBox, FetchRequest, GdalMosaicker, HttpDownloader, Product, SrtmFetcher};
use std::env;
use std::time::Instant;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 5 {
        eprintln!("Usage: {} <ll_lat> <ll_lon> <ur_lat> <ur_lon> [product] [outdir]", args[0]);
        eprintln!("Example: {} 47 -118 48 -118 SRTMGL3 ./srtm", args[0]);
        std::process::exit(1);
    }

    let coord = |i: usize| -> f64 { args[i].parse().expect("Invalid coordinate") };
    let bbox = BoundingBox::new(coord(1), coord(2), coord(3), coord(4)).expect("Invalid bounding box");
    let product: Product = args
        .get(5)
        .map(|s| s.parse().expect("Unknown product"))
        .unwrap_or(Product::Gl3);

    let mut request = FetchRequest::new(bbox, product);
    for (key, name) in request.tiles() {
        println!("{} -> {} ({})", key, name.remote_file, name.member);
    }

    // Without an output directory, only list the archives
    let Some(outdir) = args.get(6) else {
        return;
    };
    request = request.with_outdir(outdir);

    let downloader = HttpDownloader::new().expect("Failed to build HTTP client");
    let fetcher = SrtmFetcher::new(downloader, GdalMosaicker::new(ProcessRunner::new()));
    let callback: ProgressCallback = Box::new(|event: &ProgressEvent<'_>| println!("{}", event));

    let start = Instant::now();
    match fetcher.fetch(&request, Some(&callback)) {
        Ok(output) => {
            for path in output.paths() {
                println!("{}", path.display());
            }
            println!("Done in {:.1}s", start.elapsed().as_secs_f64());
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
