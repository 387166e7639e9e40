//! Tests for the processing orchestration and backend parity.

use super::*;
use crate::noise::NoiseGenerator;
use crate::sepia;

/// Single-threaded reference: every range processed in order with its own generator.
fn reference(input: &PixelBuffer, worker_count: usize, intensity: f32) -> Vec<u8> {
    let bytes = input.as_bytes();
    let mut out = vec![0u8; bytes.len()];
    let plan = partition::plan(input.pixel_count(), worker_count);
    for a in plan.active() {
        let mut noise = NoiseGenerator::new(a.worker_index);
        for p in a.pixels() {
            let o = p * CHANNELS;
            let px = sepia::apply_pixel(
                bytes[o],
                bytes[o + 1],
                bytes[o + 2],
                intensity,
                noise.next_sample(),
            );
            out[o..o + CHANNELS].copy_from_slice(&px);
        }
    }
    out
}

fn noisy_image(width: u32, height: u32) -> PixelBuffer {
    let mut rng = NoiseGenerator::new(99);
    let data = (0..width as usize * height as usize * CHANNELS)
        .map(|_| (rng.next_sample() + 100) as u8)
        .collect();
    PixelBuffer::from_bgra(width, height, data).unwrap()
}

#[test]
fn test_single_pixel_reference_both_backends() {
    let input = PixelBuffer::from_bgra(1, 1, vec![10, 20, 30, 128]).unwrap();
    for backend in Backend::ALL {
        let out = process(&input, 1, 0.5, backend).unwrap();
        assert_eq!(out.as_bytes(), &[0, 7, 14, 255], "{} backend", backend);
    }
}

#[test]
fn test_more_workers_than_pixels() {
    let input = PixelBuffer::from_bgra(2, 2, vec![50; 16]).unwrap();
    for backend in Backend::ALL {
        let out = process(&input, 8, 0.8, backend).unwrap();
        assert_eq!(out.as_bytes(), reference(&input, 8, 0.8).as_slice());
        assert!(out.as_bytes().chunks_exact(4).all(|px| px[3] == 255));
    }
}

#[test]
fn test_backend_parity() {
    for (w, h) in [(1, 1), (3, 5), (64, 48), (101, 37)] {
        let input = noisy_image(w, h);
        for workers in [1, 2, 3, 4, 7, 8, 16, 64] {
            for intensity in [0.0f32, 0.33, 0.5, 1.0] {
                let native = process(&input, workers, intensity, Backend::Native).unwrap();
                let managed = process(&input, workers, intensity, Backend::Managed).unwrap();
                assert_eq!(
                    native, managed,
                    "{}x{} with {} workers at {}",
                    w, h, workers, intensity
                );
            }
        }
    }
}

#[test]
fn test_matches_sequential_reference() {
    let input = noisy_image(37, 23);
    for workers in [1, 5, 13] {
        for backend in Backend::ALL {
            let out = process(&input, workers, 0.6, backend).unwrap();
            assert_eq!(out.as_bytes(), reference(&input, workers, 0.6).as_slice());
        }
    }
}

#[test]
fn test_repeated_calls_are_identical() {
    let input = noisy_image(40, 30);
    let first = process(&input, 6, 0.5, Backend::Native).unwrap();
    for _ in 0..5 {
        assert_eq!(process(&input, 6, 0.5, Backend::Native).unwrap(), first);
    }
}

#[test]
fn test_input_untouched_and_shape_preserved() {
    let input = noisy_image(19, 11);
    let copy = input.clone();
    let out = Backend::Managed.process(&input, 4, 1.0).unwrap();
    assert_eq!(input, copy);
    assert_eq!(out.width(), 19);
    assert_eq!(out.height(), 11);
    assert_eq!(out.as_bytes().len(), input.as_bytes().len());
}

#[test]
fn test_invalid_arguments() {
    let empty = PixelBuffer::from_bgra(0, 0, Vec::new()).unwrap();
    let image = PixelBuffer::gradient(4, 4).unwrap();
    for backend in Backend::ALL {
        assert!(matches!(
            process(&empty, 1, 0.5, backend),
            Err(VintageError::InvalidArgument(_))
        ));
        assert!(matches!(
            process(&image, 0, 0.5, backend),
            Err(VintageError::InvalidArgument(_))
        ));
        assert!(matches!(
            process(&image, 2, -0.1, backend),
            Err(VintageError::InvalidArgument(_))
        ));
        assert!(matches!(
            process(&image, 2, f32::NAN, backend),
            Err(VintageError::InvalidArgument(_))
        ));
    }
}

#[test]
fn test_first_failure_wins_after_all_workers_run() {
    use std::sync::atomic::{AtomicUsize, Ordering};

    let plan = partition::plan(40, 4);
    let pool = worker_pool(plan.active_count()).unwrap();
    let input = vec![0u8; 160];
    let mut output = vec![0u8; 160];
    let finished = AtomicUsize::new(0);

    let err = run_workers(&pool, &plan, &input, &mut output, 0.5, |_, dst, _, worker| {
        finished.fetch_add(1, Ordering::SeqCst);
        match worker {
            1 => panic!("boom"),
            2 => Err(VintageError::worker(2, "bad range")),
            _ => {
                dst.fill(1);
                Ok(())
            }
        }
    })
    .unwrap_err();

    assert_eq!(finished.load(Ordering::SeqCst), 4);
    match err {
        VintageError::ProcessingFailure {
            worker_index,
            reason,
        } => {
            assert_eq!(worker_index, 1);
            assert!(reason.contains("boom"), "{}", reason);
        }
        other => panic!("unexpected error: {other}"),
    }
    // Healthy workers still wrote their own ranges and nothing else.
    assert!(output[..40].iter().all(|&b| b == 1));
    assert!(output[40..120].iter().all(|&b| b == 0));
    assert!(output[120..].iter().all(|&b| b == 1));
}

#[test]
fn test_workers_receive_disjoint_ranges() {
    use std::sync::Mutex;

    let plan = partition::plan(1000, 7);
    let pool = worker_pool(plan.active_count()).unwrap();
    let input = vec![0u8; 4000];
    let mut output = vec![0u8; 4000];
    let seen = Mutex::new(Vec::new());

    run_workers(&pool, &plan, &input, &mut output, 0.0, |src, dst, _, worker| {
        assert_eq!(src.len(), dst.len());
        dst.fill(worker as u8 + 1);
        seen.lock().unwrap().push((worker, dst.len()));
        Ok(())
    })
    .unwrap();

    let mut seen = seen.into_inner().unwrap();
    seen.sort();
    let expected: Vec<(usize, usize)> = plan
        .assignments()
        .iter()
        .map(|a| (a.worker_index, a.pixel_count * CHANNELS))
        .collect();
    assert_eq!(seen, expected);
    for a in plan.assignments() {
        let bytes = &output[a.bytes(CHANNELS)];
        assert!(bytes.iter().all(|&b| b == a.worker_index as u8 + 1));
    }
}

#[test]
fn test_empty_assignments_never_invoked() {
    use std::sync::atomic::{AtomicUsize, Ordering};

    let plan = partition::plan(4, 8);
    let pool = worker_pool(plan.active_count()).unwrap();
    let input = vec![0u8; 16];
    let mut output = vec![0u8; 16];
    let calls = AtomicUsize::new(0);

    run_workers(&pool, &plan, &input, &mut output, 0.5, |src, _, _, worker| {
        assert!(worker < 4);
        assert_eq!(src.len(), CHANNELS);
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    })
    .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[test]
fn test_shared_pool_matches_per_call_pool() {
    let input = noisy_image(21, 13);
    let pool = worker_pool(8).unwrap();
    for workers in [1, 3, 8] {
        for backend in Backend::ALL {
            let shared = process_on(&pool, &input, workers, 0.7, backend).unwrap();
            let fresh = process(&input, workers, 0.7, backend).unwrap();
            assert_eq!(shared, fresh, "{} with {} workers", backend, workers);
        }
    }
}

#[test]
fn test_undersized_pool_rejected() {
    let input = noisy_image(8, 8);
    let pool = worker_pool(2).unwrap();
    let err = process_on(&pool, &input, 4, 0.5, Backend::Managed).unwrap_err();
    assert!(matches!(err, VintageError::InvalidArgument(_)));
    // Fewer active workers than threads is fine.
    assert!(process_on(&pool, &input, 1, 0.5, Backend::Managed).is_ok());
}

#[test]
fn test_verify_parity_report() {
    let input = noisy_image(33, 17);
    let report = verify_parity(&input, 5, 0.5).unwrap();
    assert!(report.is_identical());
    assert_eq!(report.byte_count, 33 * 17 * 4);
    assert_eq!(report.first_difference, None);
}

#[test]
fn test_backend_parsing() {
    assert_eq!("native".parse::<Backend>().unwrap(), Backend::Native);
    assert_eq!("ASM".parse::<Backend>().unwrap(), Backend::Native);
    assert_eq!(" managed ".parse::<Backend>().unwrap(), Backend::Managed);
    assert_eq!("rust".parse::<Backend>().unwrap(), Backend::Managed);
    assert!("gpu".parse::<Backend>().is_err());
    assert_eq!(Backend::Native.to_string(), "native");
    assert_eq!(Backend::Managed.tag(), "managed");
}
