use rand::{prelude::random, rngs::SmallRng, Rng, SeedableRng};
use structopt::StructOpt;

use std::{cmp::Ordering, time};

use oset::OSet;

/// Command line options.
#[derive(Clone, StructOpt)]
pub struct Opt {
    #[structopt(long = "seed")]
    seed: Option<u64>,

    #[structopt(long = "loads", default_value = "1000000")] // default 1M
    loads: usize,

    #[structopt(long = "inserts", default_value = "0")]
    inserts: usize,

    #[structopt(long = "removes", default_value = "0")]
    removes: usize,

    #[structopt(long = "gets", default_value = "0")]
    gets: usize,
}

fn main() {
    let opts = Opt::from_args();
    let seed = opts.seed.unwrap_or_else(random);
    println!("perf seed {}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut index = OSet::new(|a: &u64, b: &u64| a.cmp(b));

    // initial load
    let start = time::Instant::now();
    for _i in 0..opts.loads {
        let key: u64 = rng.gen();
        index.insert(key).ok();
    }

    println!("loaded {} items in {:?}", index.len(), start.elapsed());

    do_incremental(seed, opts, &mut index);
}

fn do_incremental<C>(seed: u64, opts: Opt, index: &mut OSet<u64, C>)
where
    C: Fn(&u64, &u64) -> Ordering,
{
    let mut rng = SmallRng::seed_from_u64(seed + 100);

    let start = time::Instant::now();
    let total = opts.inserts + opts.removes + opts.gets;
    let mut n = total;
    while n > 0 {
        let op = rng.gen::<usize>() % total;

        let key = rng.gen::<u64>();
        if op < opts.inserts {
            index.insert(key).ok();
        } else if op < (opts.inserts + opts.removes) {
            index.remove(&key).ok();
        } else {
            index.contains(&key);
        }
        n -= 1;
    }
    println!(
        "incremental for operations {}, took {:?}",
        total,
        start.elapsed()
    );

    let start = time::Instant::now();
    let mut n = 0;
    for _key in index.iter() {
        n += 1;
    }
    println!("iter for iterating {}, took {:?}", n, start.elapsed());
}
