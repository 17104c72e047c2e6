use kernel::loader::{ProgramImage, ProgramLoader, StaticLoader};
use types::{Address, HypoError, MemoryLayout};
use vm::Memory;

const ADD_PROGRAM: &str = "\
# move R0, #5 / add R0, #2 / halt
0 51060
1 5
2 11060
3 2
4 0
-1 0
";

#[test]
fn test_parse_absolute_program() {
    let image = ProgramImage::parse(ADD_PROGRAM).unwrap();
    assert_eq!(image.entry, 0);
    assert_eq!(image.words, vec![(0, 51060), (1, 5), (2, 11060), (3, 2), (4, 0)]);
    assert_eq!(image, ProgramImage::contiguous(0, &[51060, 5, 11060, 2, 0]));
}

#[test]
fn test_parse_stops_at_terminator() {
    let image = ProgramImage::parse("10 7\n-1 10\n11 garbage\n").unwrap();
    assert_eq!(image.words, vec![(10, 7)]);
    assert_eq!(image.entry, 10);
}

#[test]
fn test_parse_errors() {
    assert_eq!(ProgramImage::parse("0 1\n1 2\n"), Err(HypoError::NoEndOfProgram));
    assert_eq!(ProgramImage::parse(""), Err(HypoError::NoEndOfProgram));
    assert_eq!(ProgramImage::parse("0 x\n-1 0\n"), Err(HypoError::FileOpen));
    assert_eq!(ProgramImage::parse("0 1 2\n-1 0\n"), Err(HypoError::FileOpen));
}

#[test]
fn test_load_checks_addresses_before_writing() {
    let layout = MemoryLayout::default();
    let mut memory = Memory::new();

    let image = ProgramImage {
        words: vec![(0, 99), (2500, 1)],
        entry: 0,
    };
    assert_eq!(image.load_into(&mut memory, &layout), Err(HypoError::InvalidAddress));
    assert_eq!(memory.read(Address::from_index(0)), 0);

    let image = ProgramImage {
        words: vec![(0, 99)],
        entry: 3000,
    };
    assert_eq!(image.load_into(&mut memory, &layout), Err(HypoError::InvalidPcValue));
}

#[test]
fn test_static_loader() {
    let layout = MemoryLayout::default();
    let mut memory = Memory::new();
    let mut loader =
        StaticLoader::new().with_program("add", ProgramImage::parse(ADD_PROGRAM).unwrap());

    let entry = loader.load("add", &mut memory, &layout).unwrap();
    assert_eq!(entry, Address::from_index(0));
    assert_eq!(memory.read(Address::from_index(2)), 11060);
    assert_eq!(loader.load("other", &mut memory, &layout), Err(HypoError::FileOpen));
}
