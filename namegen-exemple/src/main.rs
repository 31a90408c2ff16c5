use namegen_core::{GenerateOptions, NameGenError, Registry};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Load every variant from the "data" directory (.dat files)
    // A .bin cache is written next to each corpus and reused on the next run
    let mut registry = Registry::from_dir("./data")?;

    // Variants can also be seeded directly from memory
    registry.seed("hobbit", ["Bilbo Baggins", "Frodo Baggins", "Samwise Gamgee", "Meriadoc Brandybuck", "Peregrin Took"]);

    // Number of retries if the generated name is already in the seed corpus
    let mut options = GenerateOptions::new();
    options.nb_try = 20;

    // Characters never seen before another character are followed by a placeholder
    options.set_placeholder('-')?;

    // Whitespace placeholders would split words
    match options.set_placeholder(' ') {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("Rejected placeholder: {e}"),
    }

    let mut variants = registry.variants();
    variants.sort();

    let mut rng = rand::rng();
    for variant in &variants {
        println!("== {variant}");
        for i in 0..10 {
            println!("Generated name {}: {}", i + 1, registry.generate_with(variant, &options, &mut rng)?);
        }
    }

    // Asking for a variant that was never seeded
    match registry.generate("unknown") {
        Err(NameGenError::UnknownVariant(label)) => println!("This variant ('{label}') does not exist"),
        _ => println!("Should not happen"),
    }

    Ok(())
}
