#[macro_use]
extern crate log;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};

use neiler::asm::Assembler;
use neiler::cpu::{CPU, ORIGIN};
use neiler::gpu::{Mode, GPU};
use neiler::machine::Machine;

fn main() -> Result<()> {
  env_logger::init()
    .map_err(|e| anyhow!("failed to initialize logger: {}", e))?;

  let matches = App::new("neiler")
    .version(env!("CARGO_PKG_VERSION"))
    .about("Neiler-8 assembler and emulator")
    .setting(AppSettings::SubcommandRequiredElseHelp)
    .subcommand(
      SubCommand::with_name("asm")
        .about("Assemble a source file into a raw binary image")
        .arg(Arg::with_name("INPUT").required(true))
        .arg(
          Arg::with_name("output")
            .short("o")
            .long("output")
            .takes_value(true)
            .default_value("output.bin"),
        )
        .arg(
          Arg::with_name("strict")
            .long("strict")
            .help("Fail on lines that match no instruction"),
        ),
    )
    .subcommand(
      SubCommand::with_name("run")
        .about("Run a program and print the final registers")
        .arg(
          Arg::with_name("PROGRAM")
            .required(true)
            .help(".asm source, or a raw binary loaded at 0x0200"),
        )
        .arg(
          Arg::with_name("cycles")
            .long("cycles")
            .takes_value(true)
            .help("Instruction budget, or instructions per frame with --frames"),
        )
        .arg(
          Arg::with_name("frames")
            .long("frames")
            .takes_value(true),
        )
        .arg(
          Arg::with_name("mode")
            .long("mode")
            .takes_value(true)
            .possible_values(&["indexed", "rgb565"])
            .default_value("indexed"),
        )
        .arg(
          Arg::with_name("ppm")
            .long("ppm")
            .takes_value(true)
            .help("Write the final framebuffer as a binary PPM"),
        ),
    )
    .get_matches();

  match matches.subcommand() {
    ("asm", Some(sub)) => asm(sub),
    ("run", Some(sub)) => run(sub),
    _ => Ok(()),
  }
}

fn asm(matches: &ArgMatches) -> Result<()> {
  let input = matches.value_of("INPUT").unwrap_or_default();
  let output = matches.value_of("output").unwrap_or("output.bin");

  let source = fs::read_to_string(input)
    .with_context(|| format!("failed to read {}", input))?;
  let assembly = Assembler::new()
    .strict(matches.is_present("strict"))
    .assemble(&source)
    .with_context(|| format!("failed to assemble {}", input))?;
  fs::write(output, &assembly.bytes)
    .with_context(|| format!("failed to write {}", output))?;

  println!(
    "Assembled {} bytes, {} labels -> {}",
    assembly.bytes.len(),
    assembly.label_count(),
    output
  );
  Ok(())
}

fn run(matches: &ArgMatches) -> Result<()> {
  let path = matches.value_of("PROGRAM").unwrap_or_default();
  let cycles = parse_count(matches, "cycles")?;
  let frames = parse_count(matches, "frames")?;
  let mode = match matches.value_of("mode") {
    Some("rgb565") => Mode::Rgb565,
    _ => Mode::Indexed,
  };

  let program = load(Path::new(path))?;
  let mut cpu = CPU::new();
  cpu
    .load_program(&program, ORIGIN)
    .with_context(|| format!("failed to load {}", path))?;

  let mut machine = Machine::new(cpu, GPU::new(mode));
  let result = match frames {
    Some(frames) => {
      if let Some(cycles) = cycles {
        machine = machine.cycles_per_frame(cycles);
      }
      machine.run_frames(frames)
    }
    None => machine.run(cycles),
  };
  info!("executed {} instructions", machine.cpu.cycles);

  println!("{}", machine.cpu.regs);
  println!("Cycles: {}", machine.cpu.cycles);

  if let Some(ppm) = matches.value_of("ppm") {
    write_ppm(&machine.gpu, Path::new(ppm))
      .with_context(|| format!("failed to write {}", ppm))?;
  }

  result.with_context(|| format!("{} stopped", path))?;
  Ok(())
}

fn parse_count(matches: &ArgMatches, name: &str) -> Result<Option<u64>> {
  match matches.value_of(name) {
    Some(v) => v
      .parse()
      .map(Some)
      .with_context(|| format!("invalid --{}: {}", name, v)),
    None => Ok(None),
  }
}

/// Read a program image, assembling it first when it is `.asm` source.
fn load(path: &Path) -> Result<Vec<u8>> {
  let is_source = path.extension().map_or(false, |ext| ext == "asm");
  if is_source {
    let source = fs::read_to_string(path)
      .with_context(|| format!("failed to read {}", path.display()))?;
    let assembly = neiler::asm::assemble(&source)
      .with_context(|| format!("failed to assemble {}", path.display()))?;
    debug!("assembled {} bytes", assembly.bytes.len());
    Ok(assembly.bytes)
  } else {
    fs::read(path).with_context(|| format!("failed to read {}", path.display()))
  }
}

fn write_ppm(gpu: &GPU, path: &Path) -> Result<()> {
  let mut out = BufWriter::new(File::create(path)?);
  write!(out, "P6\n{} {}\n255\n", gpu.width(), gpu.height())?;
  out.write_all(&gpu.framebuffer_rgb())?;
  out.flush()?;
  Ok(())
}
