//! NMEA sentence record (§3).
//!
//! The terminal output of the pipeline: one decoded AIS message,
//! already split into its (possibly multi-part) NMEA sentences. The
//! decoder that produces these is outside this crate's scope (§1
//! Non-goals); this type is the contract the pipeline's last stage
//! hands off to it.

/// A decoded AIS message, represented as the ordered NMEA sentences
/// that carry it (multi-part messages span more than one sentence).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Nmea {
    pub sentence: Vec<String>,
    pub msg: i32,
    pub repeat: i32,
    pub mmsi: i32,
}

impl Nmea {
    pub fn new(sentence: Vec<String>, msg: i32, repeat: i32, mmsi: i32) -> Self {
        Self {
            sentence,
            msg,
            repeat,
            mmsi,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_fields_verbatim() {
        let record = Nmea::new(vec!["!AIVDM,1,1,,A,...".to_string()], 1, 0, 123456789);
        assert_eq!(record.sentence.len(), 1);
        assert_eq!(record.msg, 1);
        assert_eq!(record.mmsi, 123456789);
    }
}
