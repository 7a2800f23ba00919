//! Round-trip Tests
//!
//! Collections written by a session read back equal, dimension for
//! dimension and array for array, in the original order.

use profbin::codec::Layout;
use profbin::diagnostics::{MemorySink, NullSink, Severity};
use profbin::object::{cloud_types, Atmosphere, Cloud, Record};
use profbin::session::{BinaryFile, FileSession, Ownership, ReadOptions, WriteOptions};
use std::fs;
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

fn sample_clouds(layers: &[usize]) -> Vec<Cloud> {
    layers
        .iter()
        .enumerate()
        .map(|(i, n)| {
            let mut cloud = Cloud::new(*n).unwrap();
            cloud.cloud_type = cloud_types::ICE;
            for k in 0..*n {
                cloud.effective_radius[k] = 20.0 + k as f64;
                cloud.effective_variance[k] = 0.01 * (i + 1) as f64;
                cloud.water_content[k] = 1.0e-3 * (k + 1) as f64;
            }
            cloud
        })
        .collect()
}

fn sample_atmosphere(n_layers: usize, n_absorbers: usize) -> Atmosphere {
    let mut atm = Atmosphere::new(n_layers, n_absorbers).unwrap();
    atm.climatology = 6;
    for (j, id) in atm.absorber_id.iter_mut().enumerate() {
        *id = j as i32 + 1;
    }
    for (k, p) in atm.level_pressure.iter_mut().enumerate() {
        *p = 0.1 + 100.0 * k as f64;
    }
    for k in 0..n_layers {
        atm.pressure[k] = 50.0 + 100.0 * k as f64;
        atm.temperature[k] = 200.0 + 10.0 * k as f64;
    }
    for (i, a) in atm.absorber.iter_mut().enumerate() {
        *a = i as f64 * 0.5;
    }
    atm
}

fn quiet_write() -> WriteOptions {
    WriteOptions {
        quiet: true,
        ..WriteOptions::default()
    }
}

fn quiet_read() -> ReadOptions {
    ReadOptions {
        quiet: true,
        ..ReadOptions::default()
    }
}

// =============================================================================
// Round trip
// =============================================================================

/// Three clouds with 2, 5 and 1 layers come back in order.
#[test]
fn test_three_clouds_read_back_in_order() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("clouds.bin");
    let session = FileSession::with_sink(MemorySink::new());

    let source = sample_clouds(&[2, 5, 1]);
    session.write(&path, &source, WriteOptions::default()).unwrap();

    let mut destination = vec![Cloud::default(); 3];
    let outcome = session
        .read(&path, &mut destination, ReadOptions::default())
        .unwrap();

    assert_eq!(outcome.count, 3);
    let layers: Vec<usize> = destination.iter().map(|c| c.n_layers()).collect();
    assert_eq!(layers, vec![2, 5, 1]);
    assert_eq!(destination, source);

    let info = session.sink().messages_at(Severity::Info);
    assert_eq!(info.len(), 2);
    assert!(info[0].ends_with(": 3"));
    assert!(info[1].ends_with(": 3"));
}

#[test]
fn test_atmosphere_round_trip_both_layouts() {
    let temp_dir = TempDir::new().unwrap();
    let session = FileSession::with_sink(NullSink);
    let source = vec![sample_atmosphere(3, 2), sample_atmosphere(1, 1), sample_atmosphere(10, 4)];

    for layout in [Layout::Plain, Layout::Signed] {
        let path = temp_dir.path().join(format!("atm_{:?}.bin", layout));
        let options = WriteOptions {
            layout,
            ..quiet_write()
        };
        session.write(&path, &source, options).unwrap();

        let mut destination = vec![Atmosphere::default(); 5];
        let outcome = session.read(&path, &mut destination, quiet_read()).unwrap();

        assert_eq!(outcome.count, 3);
        assert_eq!(&destination[..3], &source[..]);
        assert!(destination[3..].iter().all(|a| !a.is_associated()));
    }
}

#[test]
fn test_larger_destination_keeps_trailing_slots() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("clouds.bin");
    let session = FileSession::with_sink(NullSink);

    session
        .write(&path, &sample_clouds(&[4]), quiet_write())
        .unwrap();

    let spare = Cloud::new(7).unwrap();
    let mut destination = vec![Cloud::default(), spare.clone()];
    let outcome = session.read(&path, &mut destination, quiet_read()).unwrap();

    assert_eq!(outcome.count, 1);
    assert_eq!(destination[0].n_layers(), 4);
    assert_eq!(destination[1], spare);
}

#[test]
fn test_inquire_matches_written_count() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("clouds.bin");
    let session = FileSession::with_sink(NullSink);

    session
        .write(&path, &sample_clouds(&[1, 2, 3, 4]), quiet_write())
        .unwrap();

    let header = session.inquire::<Cloud>(&path).unwrap();
    assert_eq!(header.count, 4);
    assert_eq!(header.layout, Layout::Plain);
}

/// Files without the signed header decode exactly as before.
#[test]
fn test_hand_built_plain_file_decodes() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("legacy.bin");

    let mut bytes = Vec::new();
    bytes.extend_from_slice(&1i32.to_le_bytes()); // count
    bytes.extend_from_slice(&2i32.to_le_bytes()); // n_layers
    bytes.extend_from_slice(&cloud_types::RAIN.to_le_bytes());
    for value in [10.0f64, 11.0, 0.1, 0.2, 0.5, 0.25] {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    fs::write(&path, bytes).unwrap();

    let session = FileSession::with_sink(NullSink);
    let mut destination = vec![Cloud::default(); 1];
    session.read(&path, &mut destination, quiet_read()).unwrap();

    let cloud = &destination[0];
    assert_eq!(cloud.cloud_type, cloud_types::RAIN);
    assert_eq!(cloud.effective_radius, vec![10.0, 11.0]);
    assert_eq!(cloud.effective_variance, vec![0.1, 0.2]);
    assert_eq!(cloud.water_content, vec![0.5, 0.25]);
}

// =============================================================================
// Handles
// =============================================================================

/// Two collections through one borrowed handle, read back through another.
#[test]
fn test_borrowed_handles_share_position() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("stacked.bin");
    let session = FileSession::with_sink(NullSink);

    let first = sample_clouds(&[2, 3]);
    let second = sample_clouds(&[6]);

    let mut out = BinaryFile::create(&path).unwrap();
    let outcome = session.write(&mut out, &first, quiet_write()).unwrap();
    assert_eq!(outcome.ownership, Ownership::Borrowed);
    session.write(&mut out, &second, quiet_write()).unwrap();
    assert!(out.is_open());
    out.close().unwrap();

    let mut input = BinaryFile::open(&path).unwrap();
    let mut dest_first = vec![Cloud::default(); 2];
    let mut dest_second = vec![Cloud::default(); 2];
    session.read(&mut input, &mut dest_first, quiet_read()).unwrap();
    let outcome = session.read(&mut input, &mut dest_second, quiet_read()).unwrap();

    assert_eq!(dest_first, first);
    assert_eq!(outcome.count, 1);
    assert_eq!(dest_second[0], second[0]);
    assert_eq!(input.position().unwrap(), fs::metadata(&path).unwrap().len());
    assert!(input.is_open());
}

#[test]
fn test_keep_open_read_returns_positioned_handle() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("clouds.bin");
    let session = FileSession::with_sink(NullSink);
    session
        .write(&path, &sample_clouds(&[2]), quiet_write())
        .unwrap();

    let options = ReadOptions {
        keep_open: true,
        ..quiet_read()
    };
    let mut destination = vec![Cloud::default(); 1];
    let outcome = session.read(&path, &mut destination, options).unwrap();

    assert_eq!(outcome.ownership, Ownership::Owned);
    let mut file = outcome.handle.expect("handle kept open");
    assert_eq!(file.position().unwrap(), fs::metadata(&path).unwrap().len());

    file.rewind().unwrap();
    let mut again = vec![Cloud::default(); 1];
    session.read(&mut file, &mut again, quiet_read()).unwrap();
    assert_eq!(again, destination);
}

#[test]
fn test_close_borrowed_on_request() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("clouds.bin");
    let session = FileSession::with_sink(NullSink);

    let mut out = BinaryFile::create(&path).unwrap();
    let options = WriteOptions {
        close_borrowed: true,
        ..quiet_write()
    };
    session.write(&mut out, &sample_clouds(&[1]), options).unwrap();
    assert!(!out.is_open());

    let mut input = BinaryFile::open(&path).unwrap();
    let options = ReadOptions {
        close_borrowed: true,
        ..quiet_read()
    };
    let mut destination = vec![Cloud::default(); 1];
    session.read(&mut input, &mut destination, options).unwrap();
    assert!(!input.is_open());
    assert!(destination[0].is_associated());
}
