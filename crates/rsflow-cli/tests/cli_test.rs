//! End-to-end tests that run the `rsflow` binary.

use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::Path;
use std::process::{Command, Output};
use std::thread;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

const PROXY_VARS: [&str; 6] = [
    "HTTP_PROXY",
    "http_proxy",
    "HTTPS_PROXY",
    "https_proxy",
    "ALL_PROXY",
    "all_proxy",
];

fn rsflow(args: &[&str]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_rsflow"));
    command.args(args).env_remove("RUST_LOG").env_remove("RSFLOW_PASSWORD");
    for var in PROXY_VARS {
        command.env_remove(var);
    }
    command.output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Answer each connection with the next `(status, body)`, returning the base URL.
fn serve(responses: Vec<(u16, Vec<u8>)>) -> (String, thread::JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for (status, body) in responses {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            seen.push(request_line.trim().to_string());
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
            }

            let reason = if status == 200 { "OK" } else { "Not Found" };
            let mut stream = reader.into_inner();
            write!(
                stream,
                "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status,
                reason,
                body.len()
            )
            .unwrap();
            stream.write_all(&body).unwrap();
        }
        seen
    });

    (base, handle)
}

fn zip_bytes(member: &str, data: &[u8]) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    zip.start_file(member, SimpleFileOptions::default()).unwrap();
    zip.write_all(data).unwrap();
    zip.finish().unwrap().into_inner()
}

fn fetch_args<'a>(base: &'a str, outdir: &'a str) -> Vec<&'a str> {
    vec![
        "fetch", "--ll-lat", "47.2", "--ll-lon", "-117.5", "--ur-lat", "47.8", "--ur-lon",
        "-117.1", "--product", "SRTMGL3", "--outdir", outdir, "--base-url", base,
    ]
}

#[test]
fn test_unknown_product_exits_nonzero() {
    let output = rsflow(&[
        "fetch", "--ll-lat", "1", "--ll-lon", "1", "--ur-lat", "2", "--ur-lon", "2",
        "--product", "SRTMGL2",
    ]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Unknown SRTM product"), "{}", stderr(&output));
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_invalid_bounding_box_exits_one() {
    let output = rsflow(&[
        "fetch", "--ll-lat", "10", "--ll-lon", "0", "--ur-lat", "95", "--ur-lon", "1",
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Invalid bounding box"), "{}", stderr(&output));
}

#[test]
fn test_bad_config_is_reported() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("rsflow.yaml");
    fs::write(&config, "fetch:\n  retries: 3\n").unwrap();

    let output = rsflow(&[
        "--config",
        config.to_str().unwrap(),
        "clip",
        "--shapefile",
        "aoi.shp",
        "a.tif",
    ]);
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("Invalid config"), "{}", err);
    assert!(err.contains("unknown field"), "{}", err);
}

#[test]
fn test_fetch_prints_extracted_tile() {
    let dir = TempDir::new().unwrap();
    let outdir = dir.path().join("srtm");
    let (base, server) = serve(vec![(200, zip_bytes("N47W118.hgt", b"tile"))]);

    let output = rsflow(&fetch_args(&base, outdir.to_str().unwrap()));

    assert!(output.status.success(), "{}", stderr(&output));
    let tile = outdir.join("N47W118.hgt");
    assert_eq!(stdout(&output).trim(), tile.to_str().unwrap());
    assert_eq!(fs::read(&tile).unwrap(), b"tile");
    assert!(!outdir.join("N47W118.SRTMGL3.hgt.zip").exists());
    assert!(stderr(&output).contains("Processing 1 items"));

    let requests = server.join().unwrap();
    assert_eq!(
        requests,
        vec!["GET /SRTMGL3.003/2000.02.11/N47W118.SRTMGL3.hgt.zip HTTP/1.1"]
    );
}

#[test]
fn test_fetch_missing_tile_exits_one() {
    let dir = TempDir::new().unwrap();
    let outdir = dir.path().join("srtm");
    let (base, server) = serve(vec![(404, Vec::new())]);

    let mut args = fetch_args(&base, outdir.to_str().unwrap());
    args.push("--quiet");
    let output = rsflow(&args);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    let err = stderr(&output);
    assert!(err.contains("failed: tile (47, -118)"), "{}", err);
    assert!(err.contains("404"), "{}", err);
    assert!(!err.contains("Processing"), "{}", err);
    server.join().unwrap();
}

#[test]
fn test_fetch_mosaic_failure_still_prints_tiles() {
    let dir = TempDir::new().unwrap();
    let outdir = dir.path().join("srtm");
    let config = dir.path().join("rsflow.yaml");
    fs::write(&config, "tools:\n  gdalwarp: rsflow-test-no-such-gdalwarp\n").unwrap();
    let (base, server) = serve(vec![(200, zip_bytes("N47W118.hgt", b"tile"))]);

    let mut args = vec!["--config", config.to_str().unwrap()];
    args.extend(fetch_args(&base, outdir.to_str().unwrap()));
    args.push("--mosaic");
    let output = rsflow(&args);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output).trim(), outdir.join("N47W118.hgt").to_str().unwrap());
    let err = stderr(&output);
    assert!(err.contains("failed: mosaic:"), "{}", err);
    assert!(err.contains("rsflow-test-no-such-gdalwarp"), "{}", err);
    assert!(!outdir.join("SRTM_mosaic.tif").exists());
    server.join().unwrap();
}

/// Write an executable stand-in for `gdalwarp` that copies its second-to-last
/// argument to its last.
#[cfg(unix)]
fn fake_gdalwarp(dir: &Path) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = dir.join("fake-gdalwarp");
    fs::write(
        &script,
        "#!/bin/sh\neval src=\\${$(($# - 1))}\neval dst=\\${$#}\ncp \"$src\" \"$dst\"\n",
    )
    .unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
    script
}

#[cfg(unix)]
#[test]
fn test_clip_directory_with_configured_tool() {
    let dir = TempDir::new().unwrap();
    let scenes = dir.path().join("scenes");
    fs::create_dir(&scenes).unwrap();
    fs::write(scenes.join("b.tif"), b"b").unwrap();
    fs::write(scenes.join("a.img"), b"a").unwrap();
    fs::write(scenes.join("c.hgt"), b"c").unwrap();
    fs::write(scenes.join("notes.txt"), b"skip").unwrap();
    let shapefile = dir.path().join("aoi.shp");
    fs::write(&shapefile, b"shp").unwrap();

    let config = dir.path().join("rsflow.yaml");
    fs::write(
        &config,
        format!("tools:\n  gdalwarp: {}\nclip:\n  suffix: aoi\n", fake_gdalwarp(dir.path()).display()),
    )
    .unwrap();
    let outdir = dir.path().join("clipped");

    let output = rsflow(&[
        "-c",
        config.to_str().unwrap(),
        "clip",
        "-s",
        shapefile.to_str().unwrap(),
        "-o",
        outdir.to_str().unwrap(),
        scenes.to_str().unwrap(),
    ]);

    assert!(output.status.success(), "{}", stderr(&output));
    let expected = format!(
        "{}\n{}\n{}\n",
        outdir.join("a_aoi.img").display(),
        outdir.join("b_aoi.tif").display(),
        outdir.join("c_aoi.tif").display()
    );
    assert_eq!(stdout(&output), expected);
    assert_eq!(fs::read(outdir.join("b_aoi.tif")).unwrap(), b"b");
    assert_eq!(fs::read(outdir.join("c_aoi.tif")).unwrap(), b"c");
    assert!(!outdir.join(".b_aoi.masking.tif").exists());
}

#[test]
fn test_clip_missing_tool_exits_one() {
    let dir = TempDir::new().unwrap();
    let raster = dir.path().join("a.tif");
    fs::write(&raster, b"a").unwrap();
    let shapefile = dir.path().join("aoi.shp");
    fs::write(&shapefile, b"shp").unwrap();
    let config = dir.path().join("rsflow.yaml");
    fs::write(&config, "tools:\n  gdalwarp: rsflow-test-no-such-gdalwarp\n").unwrap();

    let output = rsflow(&[
        "--config",
        config.to_str().unwrap(),
        "clip",
        "--shapefile",
        shapefile.to_str().unwrap(),
        raster.to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("not found"), "{}", stderr(&output));
}
