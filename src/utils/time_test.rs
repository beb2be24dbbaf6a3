use std::thread::sleep;
use std::time::Duration;

use super::time::get_now_as_u64;

#[test]
fn test_get_now_as_u64() {
    let t1 = get_now_as_u64();
    sleep(Duration::from_secs(1));
    let t2 = get_now_as_u64();

    // Ensure time is moving forward by at least 1 second
    assert!(t2 > t1);
    assert!(t1 > 1609459200); // Greater than 2021-01-01
}
