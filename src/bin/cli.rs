use clap::Parser;
use jiff::Zoned;
use jiff::civil::Date;
use rotaserve::config::get_config;
use rotaserve::slot::start_of_week;
use rotaserve::store::Store;
use rotaserve::views;

#[derive(Parser)]
struct Args {
    /// JSON dataset to load instead of the built-in demo week.
    #[clap(long)]
    data: Option<String>,
    #[clap(subcommand)]
    cmd: Command,
}

#[derive(Parser)]
enum Command {
    Doctors,
    Day {
        doctor: String,
        #[clap(long)]
        date: Option<Date>,
    },
    Week {
        doctor: String,
        #[clap(long)]
        date: Option<Date>,
    },
}

fn main() {
    let args = Args::parse();
    let config = get_config();
    let now = Zoned::now().datetime();

    let store = match &args.data {
        Some(path) => Store::from_file(path).unwrap(),
        None => Store::demo(start_of_week(now.date())),
    };

    match args.cmd {
        Command::Doctors => {
            println!("{}", serde_json::to_string_pretty(store.doctors()).unwrap());
        }
        Command::Day { doctor, date } => {
            let date = date.unwrap_or_else(|| now.date());
            let schedule =
                views::day_schedule(&store, &doctor, date, now, &config.calendar).unwrap();
            println!("{}", serde_json::to_string_pretty(&schedule).unwrap());
        }
        Command::Week { doctor, date } => {
            let date = date.unwrap_or_else(|| now.date());
            let schedule =
                views::week_schedule(&store, &doctor, date, now, &config.calendar).unwrap();
            println!("{}", serde_json::to_string_pretty(&schedule).unwrap());
        }
    }
}
