use {
    crate::{
        cli::{self, Command},
        config,
        directory::Directory,
        eth::Address,
    },
    anyhow::Result,
    clap::Parser,
};

/// Parses `args`, runs the requested query and exits the process with a
/// non-zero status on failure.
pub async fn start(args: impl Iterator<Item = String>) {
    let args = cli::Args::parse_from(args);
    let obs_config = observe::Config::new(
        &args.log,
        args.log_stderr_threshold.into_level(),
        args.use_json_logs,
    );
    observe::tracing::initialize(&obs_config);
    tracing::info!("running pool registry with {args:#?}");
    observe::metrics::setup_registry(Some("pool_registry".into()), None);

    if let Err(err) = run(args).await {
        tracing::error!(?err, "pool registry failed");
        std::process::exit(1);
    }
}

pub async fn run(args: cli::Args) -> Result<()> {
    let directory = config::load(&args.config).await?.into_directory()?;
    execute(&directory, &args.command)?;
    if args.metrics {
        print!("{}", observe::metrics::encode(observe::metrics::get_registry()));
    }
    Ok(())
}

fn execute(directory: &Directory, command: &Command) -> Result<()> {
    let pools = directory.pools();
    match command {
        Command::Summary => {
            let addresses = directory.addresses();
            println!("pools: {}", pools.pool_count());
            println!("coins: {}", pools.coin_count());
            println!("address ids: {}", addresses.len());
            println!("registry: {}", addresses.get_registry());
        }
        Command::Find { from, to } => {
            let found = (0..)
                .map(|i| pools.find_pool_for_coins(*from, *to, i))
                .take_while(|pool| !pool.is_zero());
            for pool in found {
                println!("{pool} {}", pools.get_pool_name(pool));
            }
        }
        Command::CoinIndices { pool, from, to } => {
            let indices = pools.get_coin_indices(*pool, *from, *to)?;
            println!(
                "i: {} j: {} underlying: {}",
                indices.from, indices.to, indices.underlying
            );
        }
        Command::Pool { pool } => {
            let Some(record) = pools.pool(*pool) else {
                anyhow::bail!("pool {pool} is not registered");
            };
            println!("name: {}", record.name);
            println!("lp token: {}", record.lp_token);
            println!("meta: {}", record.is_meta);
            let coins = pools.get_underlying_coins(*pool);
            let decimals = pools.get_underlying_decimals(*pool);
            for (coin, decimals) in coins.iter().zip(decimals).filter(|(c, _)| !c.is_zero()) {
                println!("coin: {coin} ({decimals} decimals)");
            }
            let parameters = pools.get_parameters(*pool);
            println!("A: {} fee: {}", parameters.a, parameters.fee);
        }
        Command::Address { id } => {
            let info = directory.addresses().get_id_info(*id);
            if info.addr == Address::ZERO {
                anyhow::bail!("address id {id} was never set");
            }
            println!(
                "{} active: {} version: {} modified: {} {}",
                info.addr, info.is_active, info.version, info.last_modified, info.description
            );
        }
    }
    Ok(())
}
