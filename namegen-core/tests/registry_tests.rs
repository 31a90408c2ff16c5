use std::collections::HashSet;

use namegen_core::{GenerateOptions, NameGenError, Registry};
use rand::SeedableRng;
use rand::rngs::StdRng;

const ELF_MALE: [&str; 8] = [
	"Aerendyl", "Ailduin", "Elrond", "Erevan", "Galinndan", "Ivellios", "Laucian", "Thamior",
];

const DWARF: [&str; 6] = ["Balin Oakenshield", "Dain", "Gimli", "Thorin Stonehelm", "Bruenor", "Orsik"];

#[test]
fn end_to_end_small_corpus() {
	let mut registry = Registry::new();
	registry.seed("test", ["Aa", "Ab", "Ba"]);

	assert_eq!(registry.variants(), vec!["test".to_owned()]);

	let mut rng = StdRng::seed_from_u64(99);
	for _ in 0..200 {
		let name = registry.generate_with("test", &GenerateOptions::new(), &mut rng).unwrap();
		let chars: Vec<char> = name.chars().collect();

		assert!(!name.contains(' '), "{name}");
		assert_eq!(chars.len(), 2, "{name}");
		assert!(['A', 'B'].contains(&chars[0]), "{name}");
		assert!(['a', 'b'].contains(&chars[1]), "{name}");
	}

	assert!(registry.generate("test").is_ok());
}

#[test]
fn unknown_variant_is_an_error() {
	let mut registry = Registry::new();
	registry.seed("elf-male", ELF_MALE);

	match registry.generate("nonexistent") {
		Err(NameGenError::UnknownVariant(label)) => assert_eq!(label, "nonexistent"),
		other => panic!("expected UnknownVariant, got {other:?}"),
	}
}

#[test]
fn empty_corpus_reports_no_data() {
	let mut registry = Registry::new();
	registry.seed("empty", Vec::<String>::new());

	assert_eq!(registry.variants(), vec!["empty".to_owned()]);
	assert!(matches!(registry.generate("empty"), Err(NameGenError::NoData(_))));
}

#[test]
fn seeding_one_variant_leaves_others_untouched() {
	let mut registry = Registry::new();
	registry.seed("elf-male", ELF_MALE);
	let before = registry.variant("elf-male").unwrap().chain().clone();

	let sample = |registry: &Registry| -> Vec<String> {
		let mut rng = StdRng::seed_from_u64(7);
		(0..20)
			.map(|_| registry.generate_with("elf-male", &GenerateOptions::new(), &mut rng).unwrap())
			.collect()
	};
	let names_before = sample(&registry);

	registry.seed("dwarf", DWARF);
	registry.seed("dwarf", ["Durin"]);

	assert_eq!(registry.variant("elf-male").unwrap().chain(), &before);
	assert_eq!(sample(&registry), names_before);

	let variants: HashSet<String> = registry.variants().into_iter().collect();
	assert_eq!(variants, HashSet::from(["elf-male".to_owned(), "dwarf".to_owned()]));
}

#[test]
fn reseeding_replaces_the_model() {
	let mut registry = Registry::new();
	registry.seed("v", ["Xy"]);
	registry.seed("v", ["Qr"]);

	let mut rng = StdRng::seed_from_u64(3);
	for _ in 0..20 {
		assert_eq!(registry.generate_with("v", &GenerateOptions::new(), &mut rng).unwrap(), "Qr");
	}
	assert_eq!(registry.len(), 1);
}

#[test]
fn multi_word_names_follow_learned_word_counts() {
	let mut registry = Registry::new();
	registry.seed("dwarf", DWARF);

	let mut rng = StdRng::seed_from_u64(1);
	for _ in 0..300 {
		let name = registry.generate_with("dwarf", &GenerateOptions::new(), &mut rng).unwrap();
		let words = name.split(' ').count();
		assert!(words == 1 || words == 2, "{name}");
		assert!(name.split(' ').all(|w| !w.is_empty()), "{name}");
	}
}

#[test]
fn generated_words_use_learned_lengths_and_initials() {
	let mut registry = Registry::new();
	registry.seed("elf-male", ELF_MALE);

	let lengths: HashSet<usize> = ELF_MALE.iter().map(|n| n.chars().count()).collect();
	let initials: HashSet<char> = ELF_MALE.iter().filter_map(|n| n.chars().next()).collect();

	let mut rng = StdRng::seed_from_u64(2024);
	for _ in 0..300 {
		let name = registry.generate_with("elf-male", &GenerateOptions::new(), &mut rng).unwrap();
		assert!(lengths.contains(&name.chars().count()), "{name}");
		assert!(initials.contains(&name.chars().next().unwrap()), "{name}");
	}
}

#[test]
fn strict_mode_surfaces_missing_context() {
	let mut registry = Registry::new();
	// 'q' only ever ends a word
	registry.seed("dead-end", ["aq", "aaq"]);

	let options = GenerateOptions::new().strict();
	let mut rng = StdRng::seed_from_u64(8);
	let failures = (0..300)
		.filter(|_| {
			matches!(
				registry.generate_with("dead-end", &options, &mut rng),
				Err(NameGenError::MissingContext('q'))
			)
		})
		.count();
	assert!(failures > 0);
}
