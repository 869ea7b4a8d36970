use super::*;

#[test]
fn pool_reuses_released_pixmaps() {
    let mut p = PixmapPool::default();
    let a = p.acquire(8, 8);
    p.release(a);
    let _b = p.acquire(8, 8);

    let st = p.stats();
    assert_eq!(st.allocated, 1);
    assert_eq!(st.reused, 1);
    assert_eq!(st.retained, 0);
}

#[test]
fn pool_keys_by_size() {
    let mut p = PixmapPool::default();
    let a = p.acquire(8, 8);
    p.release(a);
    let b = p.acquire(4, 4);
    assert_eq!((b.width(), b.height()), (4, 4));
    assert_eq!(p.stats().allocated, 2);
    assert_eq!(p.stats().retained, 1);
}

#[test]
fn pool_honors_per_size_cap() {
    let mut p = PixmapPool::new(PixmapPoolOpts {
        max_idle: 8,
        max_idle_per_size: 1,
    });
    let a = p.acquire(8, 8);
    let b = p.acquire(8, 8);
    p.release(a);
    p.release(b);

    let st = p.stats();
    assert_eq!(st.retained, 1);
    assert_eq!(st.retained_bytes, 8 * 8 * 4);
    assert_eq!(st.dropped_on_release, 1);
}

#[test]
fn pool_honors_total_cap() {
    let mut p = PixmapPool::new(PixmapPoolOpts {
        max_idle: 1,
        max_idle_per_size: 4,
    });
    let a = p.acquire(8, 8);
    let b = p.acquire(2, 2);
    p.release(a);
    p.release(b);
    assert_eq!(p.stats().retained, 1);
    assert_eq!(p.stats().dropped_on_release, 1);
}

#[test]
fn release_clears_pixels() {
    let mut p = PixmapPool::default();
    let mut a = p.acquire(2, 2);
    a.data_as_u8_slice_mut().fill(200);
    p.release(a);
    let b = p.acquire(2, 2);
    assert!(b.data_as_u8_slice().iter().all(|&v| v == 0));
}

#[test]
fn clear_drops_idle_set() {
    let mut p = PixmapPool::default();
    let a = p.acquire(2, 2);
    p.release(a);
    p.clear();
    assert_eq!(p.stats().retained, 0);
    let _ = p.acquire(2, 2);
    assert_eq!(p.stats().allocated, 2);
}
