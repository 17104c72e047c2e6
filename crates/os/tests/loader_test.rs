use std::fs;
use std::path::PathBuf;

use kernel::ProgramLoader;
use os::FileLoader;
use types::{Address, HypoError, MemoryLayout};
use vm::Memory;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("hypo-os-{}-{}", name, std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_file_loader_reads_program() {
    let dir = scratch_dir("read");
    fs::write(dir.join("add.hypo"), "# move R0, #5; halt\n0 51060\n1 5\n2 0\n-1 0\n").unwrap();

    let mut loader = FileLoader::new(&dir);
    let mut memory = Memory::default();
    let entry = loader.load("add.hypo", &mut memory, &MemoryLayout::default()).unwrap();
    assert_eq!(entry.index(), 0);
    assert_eq!(memory.slice(Address::from_index(0), 3), Some(&[51060, 5, 0][..]));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_file_loader_missing_file() {
    let dir = scratch_dir("missing");
    let mut loader = FileLoader::new(&dir);
    let mut memory = Memory::default();
    assert_eq!(
        loader.load("nope.hypo", &mut memory, &MemoryLayout::default()),
        Err(HypoError::FileOpen)
    );
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_file_loader_resolves_absolute_paths() {
    let loader = FileLoader::new("/programs");
    assert_eq!(loader.resolve("a.hypo"), PathBuf::from("/programs/a.hypo"));
    assert_eq!(loader.resolve("/tmp/b.hypo"), PathBuf::from("/tmp/b.hypo"));
}
