mod common;

use chrono::NaiveDate;
use odm::omm::{self, Omm};
use odm::Error;

use common::{read_fixture, required_keys, without_key};

#[test]
fn basic() {
    let omm = Omm::decode(&read_fixture("omm_basic.txt")).unwrap();

    assert_eq!(omm.header.version, "3.0");
    assert_eq!(
        omm.header.creation_date,
        NaiveDate::from_ymd_opt(2020, 3, 5)
            .unwrap()
            .and_hms_opt(16, 0, 0)
            .unwrap()
            .and_utc(),
        "day of year 065 of a leap year"
    );
    assert_eq!(omm.header.originator, "NOAA");
    assert_eq!(omm.header.message_id.as_deref(), Some("OMM 202013719185"));

    assert_eq!(omm.metadata.object_name, "GOES 9");
    assert_eq!(omm.metadata.object_id, "1995-025A");
    assert_eq!(omm.metadata.ref_frame, "TEME");
    assert_eq!(omm.metadata.mean_element_theory.as_deref(), Some("SGP/SGP4"));

    let mean = &omm.data.mean_elements;
    assert_eq!(
        mean.epoch,
        NaiveDate::from_ymd_opt(2020, 3, 4)
            .unwrap()
            .and_hms_micro_opt(10, 34, 41, 426_400)
            .unwrap()
            .and_utc()
    );
    assert_eq!(mean.semi_major_axis, None);
    assert_eq!(mean.mean_motion, Some(1.00273272));
    assert_eq!(mean.eccentricity, 0.0005013);
    assert_eq!(mean.inclination, 3.0539);
    assert_eq!(mean.ra_of_asc_node, 81.7939);
    assert_eq!(mean.arg_of_pericenter, 249.2363);
    assert_eq!(mean.mean_anomaly, 150.1602);
    assert_eq!(mean.gm, Some(398600.8));

    let tle = &omm.data.tle_parameters;
    assert_eq!(tle.ephemeris_type.as_deref(), Some("0"));
    assert_eq!(tle.classification_type.as_deref(), Some("U"));
    assert_eq!(tle.norad_cat_id, Some(23581));
    assert_eq!(tle.element_set_no, Some(925));
    assert_eq!(tle.rev_at_epoch, Some(4316));
    assert_eq!(tle.bstar, Some(0.0001));
    assert_eq!(tle.bterm, None);
    assert_eq!(tle.mean_motion_dot, Some(-0.00000113));
    assert_eq!(tle.mean_motion_ddot, Some(0.0));

    assert_eq!(omm.data.spacecraft_parameters.mass, None);
    assert!(omm.data.covariance_matrix.is_empty());
    assert!(omm.data.user_defined.is_empty());
}

#[test]
fn covariance() {
    let omm = Omm::decode(&read_fixture("omm_covariance.txt")).unwrap();
    let cov = &omm.data.covariance_matrix;

    assert_eq!(cov.cov_ref_frame.as_deref(), Some("TEME"));
    assert!(
        cov.lower_triangle.iter().all(Option::is_some),
        "all terms should be present"
    );
    assert_eq!(cov.get(0, 0), Some(3.331349476038534e-04));
    assert_eq!(cov.get(1, 0), Some(4.618927349220216e-04));
    assert_eq!(cov.get(0, 1), Some(4.618927349220216e-04));
    assert_eq!(cov.get(3, 2), Some(2.484949578400095e-07));
    assert_eq!(cov.get(4, 5), Some(1.008862586240695e-10));
    assert_eq!(cov.get(5, 5), Some(6.224444338635500e-10));
    assert_eq!(omm.header.message_id, None);
}

#[test]
fn user_defined_and_units() {
    let omm = Omm::decode(&read_fixture("omm_user_defined.txt")).unwrap();

    assert_eq!(omm.data.mean_elements.gm, Some(398600.8));
    assert_eq!(omm.data.mean_elements.inclination, 3.0539);
    assert_eq!(omm.data.tle_parameters.mean_motion_ddot, Some(0.0));
    assert_eq!(omm.data.user_defined.len(), 1);
    assert_eq!(omm.data.user_defined["USER_DEFINED_EARTH_MODEL"], "WGS-84");
}

#[test]
fn user_defined_anywhere() {
    let text = read_fixture("omm_basic.txt").replace(
        "OBJECT_NAME = GOES 9",
        "USER_DEFINED_ANTENNA = DISH\nOBJECT_NAME = GOES 9",
    );
    let text = format!("USER_DEFINED_FIRST = 1\n{text}\nUSER_DEFINED_LAST = 2");

    let omm = Omm::decode(&text).unwrap();

    assert_eq!(omm.data.user_defined.len(), 3);
    assert_eq!(omm.data.user_defined["USER_DEFINED_FIRST"], "1");
    assert_eq!(omm.data.user_defined["USER_DEFINED_ANTENNA"], "DISH");
    assert_eq!(omm.data.user_defined["USER_DEFINED_LAST"], "2");
    assert_eq!(omm.metadata.object_name, "GOES 9");
}

#[test]
fn comments_attach_to_following_section() {
    let text = read_fixture("omm_basic.txt").replace(
        "EPOCH =",
        "COMMENT first\nCOMMENT second\nCOMMENT third\nEPOCH =",
    );

    let omm = Omm::decode(&text).unwrap();

    assert_eq!(
        omm.data.mean_elements.comments,
        vec!["first", "second", "third"]
    );
    assert!(omm.metadata.comments.is_empty());
    assert_eq!(omm.data.mean_elements.eccentricity, 0.0005013);
}

#[test]
fn missing_required_keys() {
    let text = read_fixture("omm_basic.txt");
    for key in required_keys(omm::SCHEMA) {
        let zult = Omm::decode(&without_key(&text, key));
        assert!(
            matches!(
                zult,
                Err(Error::KeyMismatch { expected, .. } | Error::UnexpectedEndOfInput { expected })
                    if expected == key
            ),
            "without {key}: got {zult:?}"
        );
    }
}

#[test]
fn out_of_order_key() {
    // INCLINATION moved ahead of ECCENTRICITY
    let text = read_fixture("omm_basic.txt").replace(
        "ECCENTRICITY = 0.0005013\nINCLINATION = 3.0539",
        "INCLINATION = 3.0539\nECCENTRICITY = 0.0005013",
    );
    let zult = Omm::decode(&text);
    match zult {
        Err(Error::KeyMismatch {
            expected,
            actual,
            line,
        }) => {
            assert_eq!(expected, "ECCENTRICITY");
            assert_eq!(actual, "INCLINATION");
            assert_eq!(line, 13);
        }
        other => panic!("expected KeyMismatch, got {other:?}"),
    }
}

#[test]
fn invalid_integer() {
    let text = read_fixture("omm_basic.txt").replace("NORAD_CAT_ID = 23581", "NORAD_CAT_ID = 2358A");
    let zult = Omm::decode(&text);
    assert!(
        matches!(
            zult,
            Err(Error::NumberParse {
                key: "NORAD_CAT_ID",
                ..
            })
        ),
        "got {zult:?}"
    );
}
