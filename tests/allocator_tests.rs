// Integration tests for output path allocation
//
// These tests verify that sequentially allocated paths never collide and
// that the forward scan interacts correctly with files already on disk.

use anyhow::Result;
use audio_intake::PathAllocator;
use std::collections::HashSet;
use std::fs::File;
use tempfile::TempDir;

#[test]
fn test_sequential_allocations_are_unique() -> Result<()> {
    let dir = TempDir::new()?;
    let allocator = PathAllocator::new(dir.path());

    let mut seen = HashSet::new();
    for _ in 0..25 {
        let path = allocator.allocate();
        assert!(seen.insert(path.clone()), "path {:?} allocated twice", path);
        File::create(&path)?;
    }

    assert_eq!(seen.len(), 25);
    Ok(())
}

#[test]
fn test_allocations_advance_without_file_creation() -> Result<()> {
    let dir = TempDir::new()?;
    let allocator = PathAllocator::new(dir.path());

    // The counter is the forward-scan hint, so even when nothing is written
    // to the allocated path, the next call moves on.
    let first = allocator.allocate();
    let second = allocator.allocate();

    assert_eq!(first.file_name().unwrap(), "00001.wav");
    assert_eq!(second.file_name().unwrap(), "00002.wav");
    Ok(())
}

#[test]
fn test_scan_skips_existing_files() -> Result<()> {
    let dir = TempDir::new()?;
    let allocator = PathAllocator::new(dir.path());

    for name in ["00001.wav", "00002.wav", "00003.wav"] {
        File::create(dir.path().join(name))?;
    }

    let path = allocator.allocate();
    assert_eq!(path.file_name().unwrap(), "00004.wav");
    Ok(())
}

#[test]
fn test_fresh_allocator_rescans_from_bottom() -> Result<()> {
    let dir = TempDir::new()?;

    let allocator = PathAllocator::new(dir.path());
    allocator.allocate();
    allocator.allocate();

    // Numbering state is in-memory only: a new allocator over the same
    // directory starts over and, with no files on disk, reissues the
    // same names.
    let restarted = PathAllocator::new(dir.path());
    assert_eq!(restarted.allocate().file_name().unwrap(), "00001.wav");
    Ok(())
}

#[test]
fn test_allocated_paths_live_in_the_output_directory() -> Result<()> {
    let dir = TempDir::new()?;
    let allocator = PathAllocator::new(dir.path());

    let path = allocator.allocate();
    assert_eq!(path.parent().unwrap(), dir.path());
    assert_eq!(path.extension().unwrap(), "wav");
    Ok(())
}
