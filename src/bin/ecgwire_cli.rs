use std::error::Error;
use std::net::SocketAddr;
use std::time::Duration;

use clap::{Parser, Subcommand};

use ecgwire::protocol::TmpBspValues;
use ecgwire::{ClientConfig, DipoleVector, SimulatorClient};

#[derive(Parser)]
#[command(version, about = "Exercise a running simulator over its binary protocol", long_about = None)]
struct Cli {
    /// Simulator address
    address: SocketAddr,

    /// Socket timeout in milliseconds (connect, read and write)
    #[arg(short, long)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the simulator's probe names
    ProbesNames,
    /// Fetch the accumulated probe value table
    ProbesValues,
    /// Point the dipole source at a vector
    #[command(allow_negative_numbers = true)]
    SetDipole { x: f64, y: f64, z: f64 },
    /// Replace the dipole vector sequence; values are x y z triples
    #[command(allow_negative_numbers = true)]
    SetDipoleSeq {
        #[arg(required = true)]
        values: Vec<f64>,
    },
    /// Run one forward calculation for a vector
    #[command(allow_negative_numbers = true)]
    CalculateVector { x: f64, y: f64, z: f64 },
    /// Run forward calculations for server-drawn random vectors
    CalculateRandom {
        samples: u32,
        #[arg(default_value_t = 1.0)]
        max_radius: f64,
    },
    /// Fetch the TMP and BSP matrices of the current run
    TmpBsp,
    /// Fetch TMP and BSP matrices sampled at the probes
    TmpBspProbes,
    /// Probe-sampled matrices computed from the uploaded TMP table
    TmpBspProbes2,
    /// Fetch the probe TMP table and upload it back unchanged
    EchoTmp,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize env_logger; For logging to STDOUT/STDERR
    env_logger::init();

    let cli = Cli::parse();
    let timeout = cli.timeout.map(Duration::from_millis);
    let config = ClientConfig {
        connect_timeout: timeout,
        read_timeout: timeout,
        write_timeout: timeout,
    };
    let client = SimulatorClient::with_config(cli.address, config);

    match cli.command {
        Commands::ProbesNames => {
            for name in client.get_probes_names()? {
                println!("{name}");
            }
        }
        Commands::ProbesValues => {
            let table = client.get_probes_values()?;
            println!("{}", table.columns.join("\t"));
            for row in table.values.iter_rows() {
                println!("{}", join(row));
            }
        }
        Commands::SetDipole { x, y, z } => {
            client.set_dipole_vector(DipoleVector::new(x, y, z))?;
            println!("ok");
        }
        Commands::SetDipoleSeq { values } => {
            if values.len() % 3 != 0 {
                return Err("expected whole x y z triples".into());
            }
            let vectors = values
                .chunks(3)
                .map(|v| DipoleVector::new(v[0], v[1], v[2]))
                .collect();
            client.set_dipole_vector_values(vectors)?;
            println!("ok");
        }
        Commands::CalculateVector { x, y, z } => {
            let reading = client.calculate_values_for_vector(DipoleVector::new(x, y, z))?;
            println!("dipole: {}", reading.dipole);
            println!("{}", join(&reading.probes));
        }
        Commands::CalculateRandom {
            samples,
            max_radius,
        } => {
            for reading in client.calculate_values_for_random_vectors(samples, max_radius)? {
                println!("{}\t{}", reading.dipole, join(&reading.probes));
            }
        }
        Commands::TmpBsp => print_run(&client.get_tmp_bsp_values()?),
        Commands::TmpBspProbes => print_run(&client.get_tmp_bsp_values_probes()?),
        Commands::TmpBspProbes2 => print_run(&client.get_tmp_bsp_values_probes2()?),
        Commands::EchoTmp => {
            let values = client.get_tmp_bsp_values_probes2()?;
            let tmp = values.tmp;
            println!("echoing tmp: {} x {}", tmp.rows(), tmp.cols());
            client.set_tmp_values(tmp)?;
            println!("ok");
        }
    }

    Ok(())
}

fn print_run(values: &TmpBspValues) {
    println!("tmp: {} x {}", values.tmp.rows(), values.tmp.cols());
    for row in values.tmp.iter_rows() {
        println!("{}", join(row));
    }
    println!("bsp: {} x {}", values.bsp.rows(), values.bsp.cols());
    for row in values.bsp.iter_rows() {
        println!("{}", join(row));
    }
}

fn join(values: &[f64]) -> String {
    values
        .iter()
        .map(f64::to_string)
        .collect::<Vec<_>>()
        .join("\t")
}
