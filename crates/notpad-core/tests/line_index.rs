use notpad_core::{Address, Buffer, Editor, EditorConfig, LineIndex, TextHost};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ALPHABET: &[char] = &['a', 'b', ' ', '\n', '#', '\'', '1', '你', 'é'];

fn random_text(rng: &mut StdRng, len: usize) -> String {
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())])
        .collect()
}

#[test]
fn test_offset_address_round_trip_random() {
    let mut rng = StdRng::seed_from_u64(0x6e6f_7470);
    for _ in 0..200 {
        let len = rng.gen_range(0..80);
        let text = random_text(&mut rng, len);
        let index = LineIndex::new(&text);

        for offset in 0..=index.char_count() {
            let address = index.offset_to_address(offset);
            assert_eq!(
                index.address_to_offset(address),
                Some(offset),
                "text {text:?} offset {offset}"
            );
        }
    }
}

#[test]
fn test_addresses_are_monotonic() {
    let mut rng = StdRng::seed_from_u64(7);
    let text = random_text(&mut rng, 500);
    let index = LineIndex::new(&text);

    let addresses: Vec<Address> = (0..=index.char_count())
        .map(|o| index.offset_to_address(o))
        .collect();
    for pair in addresses.windows(2) {
        assert!((pair[0].line, pair[0].column) < (pair[1].line, pair[1].column));
    }
}

#[test]
fn test_line_count_matches_newlines() {
    let index = LineIndex::new("a\n\nb\n");
    assert_eq!(index.line_count(), 4);
    assert_eq!(index.offset_to_address(2), Address::new(2, 0));
    assert_eq!(index.offset_to_address(5), Address::new(4, 0));
    assert_eq!(index.address_to_offset(Address::new(2, 1)), None);
    assert_eq!(index.address_to_offset(Address::new(5, 0)), None);
}

#[test]
fn test_index_follows_random_edits() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut editor = Editor::python(Buffer::new(""), EditorConfig::default()).unwrap();

    for _ in 0..100 {
        let len = editor.host().len_chars();
        let start = rng.gen_range(0..=len);
        let end = rng.gen_range(start..=len.min(start + 5));
        let insert_len = rng.gen_range(0..6);
        let insert = random_text(&mut rng, insert_len);
        editor.edit(start, end, &insert).unwrap();

        assert_eq!(editor.line_index(), &LineIndex::new(&editor.host().text()));
    }
}
