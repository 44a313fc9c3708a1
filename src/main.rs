use std::env;
use std::fs;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: ambitus <tune.abc> <range.yaml> [output.abc]");
        eprintln!("       ambitus --check <tune.abc>");
        process::exit(1);
    }

    if args[1] == "--check" {
        if args.len() < 3 {
            eprintln!("Usage: ambitus --check <tune.abc>");
            process::exit(1);
        }
        let tune = read_file(&args[2]);
        match ambitus::check_tune(&tune) {
            Ok(canonical) => println!("{}", canonical),
            Err(e) => {
                eprintln!("Tune error: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    if args.len() < 3 {
        eprintln!("Usage: ambitus <tune.abc> <range.yaml> [output.abc]");
        process::exit(1);
    }

    let tune = read_file(&args[1]);
    let range = read_file(&args[2]);
    let output_path = args.get(3);

    let spec = match ambitus::RangeSpec::from_yaml(&range) {
        Ok(spec) => spec,
        Err(e) => {
            eprintln!("Range error: {}", e);
            process::exit(1);
        }
    };

    let exercise = match ambitus::build_exercise(&tune, &spec) {
        Ok(exercise) => exercise,
        Err(e) => {
            eprintln!("Exercise error: {}", e);
            process::exit(1);
        }
    };

    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &exercise) {
                eprintln!("Error writing to '{}': {}", path, e);
                process::exit(1);
            }
            eprintln!("Wrote exercise to {}", path);
        }
        None => {
            println!("{}", exercise);
        }
    }
}

fn read_file(path: &str) -> String {
    match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path, e);
            process::exit(1);
        }
    }
}
