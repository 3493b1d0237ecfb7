use crate::fixed::Fixed;

#[test]
fn wire_round_trip() {
    for raw in [0, 1, -1, 256, -256, i32::MAX, i32::MIN, 0x1234_5678] {
        assert_eq!(Fixed::from_wire(raw).to_wire(), raw);
    }
}

#[test]
fn to_f64() {
    assert_eq!(Fixed::ZERO.to_f64(), 0.0);
    assert_eq!(Fixed::ONE.to_f64(), 1.0);
    assert_eq!(Fixed::EPSILON.to_f64(), 1.0 / 256.0);
    assert_eq!(Fixed::from_wire(-384).to_f64(), -1.5);
}

#[test]
fn from_f64() {
    assert_eq!(Fixed::from_f64_lossy(1.5), Fixed::from_wire(384));
    assert_eq!(Fixed::from_f64_lossy(-1.5), Fixed::from_wire(-384));
    assert_eq!(Fixed::from_f64_lossy(0.0), Fixed::ZERO);
    assert_eq!(Fixed::from_f64_lossy(f64::NAN), Fixed::ZERO);
    assert_eq!(Fixed::from_f64_lossy(1e30), Fixed::MAX);
    assert_eq!(Fixed::from_f64_lossy(-1e30), Fixed::MIN);
}

#[test]
fn from_i32() {
    assert_eq!(Fixed::from_i32_saturating(2).to_f64(), 2.0);
    assert_eq!(Fixed::from_i32_saturating(i32::MAX), Fixed::MAX);
    assert_eq!(Fixed::from_i32_saturating(i32::MIN), Fixed::MIN);
}

#[test]
fn to_i32() {
    let v = Fixed::from_f64_lossy(2.75);
    assert_eq!(v.to_i32_floor(), 2);
    assert_eq!(v.to_i32_round_towards_zero(), 2);
    let v = Fixed::from_f64_lossy(-2.75);
    assert_eq!(v.to_i32_floor(), -3);
    assert_eq!(v.to_i32_round_towards_zero(), -2);
}

#[test]
fn arithmetic() {
    assert_eq!(Fixed::ONE + Fixed::ONE, Fixed::from_i32_saturating(2));
    assert_eq!(Fixed::ONE - Fixed::ONE, Fixed::ZERO);
    assert_eq!(-Fixed::ONE, Fixed::from_i32_saturating(-1));
    let mut v = Fixed::ZERO;
    v += Fixed::ONE;
    v -= Fixed::EPSILON;
    assert_eq!(v.to_wire(), 255);
}

#[test]
fn formatting() {
    assert_eq!(format!("{}", Fixed::from_f64_lossy(1.5)), "1.5");
    assert_eq!(format!("{:?}", Fixed::ONE), "1.0");
}
