use super::*;

const IN_OUT: [Ease; 10] = [
    Ease::InOutQuad,
    Ease::InOutCubic,
    Ease::InOutQuart,
    Ease::InOutQuint,
    Ease::InOutSine,
    Ease::InOutExpo,
    Ease::InOutCirc,
    Ease::InOutElastic,
    Ease::InOutBack,
    Ease::InOutBounce,
];

#[test]
fn endpoints_are_exact() {
    for ease in Ease::ALL {
        for (b, c, d) in [(0.0, 1.0, 1.0), (1.0, 1.0, 750.0), (-3.5, 10.25, 100.0), (2.0, -2.0, 16.0)] {
            assert_eq!(ease.ease(0.0, b, c, d), b, "{ease} at t=0");
            assert_eq!(ease.ease(d, b, c, d), b + c, "{ease} at t=d");
        }
        assert_eq!(ease.apply(0.0), 0.0);
        assert_eq!(ease.apply(1.0), 1.0);
    }
}

#[test]
fn out_of_range_time_is_pinned() {
    for ease in Ease::ALL {
        assert_eq!(ease.ease(-5.0, 2.0, 3.0, 10.0), 2.0);
        assert_eq!(ease.ease(25.0, 2.0, 3.0, 10.0), 5.0);
    }
}

#[test]
fn special_cased_boundaries_hold_without_the_pin() {
    assert_eq!(in_expo(0.0, 4.0, 2.0, 10.0), 4.0);
    assert_eq!(out_expo(10.0, 4.0, 2.0, 10.0), 6.0);
    assert_eq!(in_out_expo(0.0, 4.0, 2.0, 10.0), 4.0);
    assert_eq!(in_out_expo(10.0, 4.0, 2.0, 10.0), 6.0);
    assert_eq!(in_elastic(0.0, 4.0, 2.0, 10.0), 4.0);
    assert_eq!(in_elastic(10.0, 4.0, 2.0, 10.0), 6.0);
    assert_eq!(out_elastic(10.0, 4.0, 2.0, 10.0), 6.0);
    assert_eq!(in_out_elastic(10.0, 4.0, 2.0, 10.0), 6.0);
}

#[test]
fn in_out_variants_are_continuous_at_midpoint() {
    let (b, c, d) = (1.0, 4.0, 200.0);
    for ease in IN_OUT {
        let mid = ease.ease(d / 2.0, b, c, d);
        assert!((mid - (b + c / 2.0)).abs() < 1e-9, "{ease} midpoint = {mid}");

        let eps = 1e-6;
        let left = ease.ease(d / 2.0 - eps, b, c, d);
        let right = ease.ease(d / 2.0 + eps, b, c, d);
        assert!((left - right).abs() < 1e-3, "{ease} jumps at midpoint");
    }
}

#[test]
fn in_out_bounce_splices_halves() {
    let (b, c, d) = (0.0, 1.0, 1.0);
    let t = 0.2;
    let expected_in = in_bounce(t * 2.0, 0.0, c, d) * 0.5 + b;
    assert_eq!(in_out_bounce(t, b, c, d), expected_in);
    let t = 0.8;
    let expected_out = out_bounce(t * 2.0 - d, 0.0, c, d) * 0.5 + c * 0.5 + b;
    assert_eq!(in_out_bounce(t, b, c, d), expected_out);
}

#[test]
fn monotonic_spot_check() {
    for ease in [
        Ease::Linear,
        Ease::InQuad,
        Ease::OutQuad,
        Ease::InOutQuad,
        Ease::InCubic,
        Ease::OutCubic,
        Ease::InOutCubic,
        Ease::InQuart,
        Ease::OutQuint,
        Ease::InOutSine,
        Ease::OutExpo,
        Ease::InOutCirc,
    ] {
        let a = ease.apply(0.25);
        let b = ease.apply(0.5);
        let c = ease.apply(0.75);
        assert!(a < b, "{ease}");
        assert!(b < c, "{ease}");
    }
}

#[test]
fn back_curves_overshoot() {
    assert!(Ease::InBack.apply(0.2) < 0.0);
    assert!(Ease::OutBack.apply(0.8) > 1.0);
    assert!(in_back_with(0.2, 0.0, 1.0, 1.0, 0.0) >= 0.0);
    assert!(in_back_with(0.2, 0.0, 1.0, 1.0, 3.0) < in_back(0.2, 0.0, 1.0, 1.0));
}

#[test]
fn elastic_amplitude_parameter() {
    let default = out_elastic(0.1, 0.0, 1.0, 1.0);
    let same = out_elastic_with(0.1, 0.0, 1.0, 1.0, Some(0.5), None);
    assert_eq!(default, same, "amplitude below |c| falls back to c");
    let wide = out_elastic_with(0.1, 0.0, 1.0, 1.0, Some(2.0), None);
    assert_ne!(default, wide);
}

#[test]
fn linear_is_proportional() {
    assert_eq!(Ease::Linear.ease(20.0, 0.0, 1.0, 100.0), 0.2);
    assert_eq!(Ease::Linear.ease(50.0, 10.0, -4.0, 100.0), 8.0);
}

#[test]
fn names_round_trip() {
    for ease in Ease::ALL {
        assert_eq!(Ease::from_name(ease.name()).unwrap(), ease);
        let json = serde_json::to_string(&ease).unwrap();
        assert_eq!(json, format!("\"{}\"", ease.name()));
    }
    assert_eq!("EASEOUTQUAD".parse::<Ease>().unwrap(), Ease::OutQuad);
    assert_eq!(Ease::default(), Ease::OutQuad);
}

#[test]
fn unknown_name_is_a_validation_error() {
    let err = Ease::from_name("easeSideways").unwrap_err();
    assert!(err.to_string().contains("unknown easing 'easeSideways'"));
}
