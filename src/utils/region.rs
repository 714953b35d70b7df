use crate::utils::Result;

/// A 1-based, end-inclusive window on a contig
#[derive(Debug, PartialEq, Clone)]
pub struct GenomicRegion {
    pub contig: String,
    pub start: u64,
    pub end: u64,
}

impl GenomicRegion {
    pub fn new(contig: impl Into<String>, start: u64, end: u64) -> Result<Self> {
        if start >= end {
            return Err(format!("Invalid region: start {} >= end {}", start, end));
        }
        if start == 0 {
            return Err("Invalid region: positions are 1-based".to_string());
        }

        Ok(Self {
            contig: contig.into(),
            start,
            end,
        })
    }

    /// Window of `length` bases beginning at `start`
    pub fn from_start_length(contig: impl Into<String>, start: u64, length: u64) -> Result<Self> {
        if length < 2 {
            return Err(format!("Invalid region length {}: must be at least 2", length));
        }
        let end = start.checked_add(length - 1).ok_or_else(|| {
            format!(
                "Invalid region: {} bases from {} run past the largest position",
                length, start
            )
        })?;
        Self::new(contig, start, end)
    }

    /// Parses `contig:start-end`; thousands separators in positions are accepted
    pub fn from_string(encoding: &str) -> Result<Self> {
        let invalid = || {
            format!(
                "Invalid region encoding '{}': expected 'contig:start-end'",
                encoding
            )
        };
        let (contig, interval) = encoding.rsplit_once(':').ok_or_else(invalid)?;
        let (start, end) = interval.split_once('-').ok_or_else(invalid)?;
        if contig.is_empty() {
            return Err(invalid());
        }
        Self::from_fields(contig, start, end)
    }

    fn from_fields(contig: &str, start: &str, end: &str) -> Result<Self> {
        let parse = |field: &str, what: &str| {
            field.replace(',', "").parse::<u64>().map_err(|_| {
                format!(
                    "Invalid {} position '{}': must be a positive integer",
                    what, field
                )
            })
        };
        Self::new(contig, parse(start, "start")?, parse(end, "end")?)
    }

    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn intersect_position(&self, position: u64) -> bool {
        position >= self.start && position <= self.end
    }

    pub fn contains_interval(&self, start: u64, end: u64) -> bool {
        start >= self.start && end <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::GenomicRegion;

    #[test]
    fn init_region_from_valid_string_ok() {
        let region = GenomicRegion::from_string("NC_000913.3:100-200").unwrap();
        assert_eq!(region.contig, "NC_000913.3");
        assert_eq!(region.start, 100);
        assert_eq!(region.end, 200);
        assert_eq!(region.len(), 101);
    }

    #[test]
    fn init_region_with_separators_and_colon_in_contig() {
        let region = GenomicRegion::from_string("HLA:A:1,000-2,500").unwrap();
        assert_eq!(region.contig, "HLA:A");
        assert_eq!(region.start, 1000);
        assert_eq!(region.end, 2500);
    }

    #[test]
    fn init_region_from_invalid_string_err() {
        assert_eq!(
            GenomicRegion::from_string("chr1-100-200"),
            Err("Invalid region encoding 'chr1-100-200': expected 'contig:start-end'".to_string())
        );
        assert!(GenomicRegion::from_string(":1-2").is_err());
    }

    #[test]
    fn init_region_from_invalid_start_err() {
        assert_eq!(
            GenomicRegion::from_string("chr1:a-200"),
            Err("Invalid start position 'a': must be a positive integer".to_string())
        );
    }

    #[test]
    fn init_region_from_invalid_interval_err() {
        assert_eq!(
            GenomicRegion::from_string("chr1:200-100"),
            Err("Invalid region: start 200 >= end 100".to_string())
        );
        assert!(GenomicRegion::new("chr1", 0, 100).is_err());
    }

    #[test]
    fn init_region_from_start_and_length() {
        let region = GenomicRegion::from_start_length("chr1", 1001, 500).unwrap();
        assert_eq!(region.end, 1500);
        assert_eq!(region.len(), 500);
        assert!(GenomicRegion::from_start_length("chr1", 10, 1).is_err());
    }

    #[test]
    fn start_and_length_past_the_largest_position_err() {
        let err = GenomicRegion::from_start_length("chr1", u64::MAX - 5, 100).unwrap_err();
        assert!(err.ends_with("run past the largest position"));
        let last = GenomicRegion::from_start_length("chr1", u64::MAX - 9, 10).unwrap();
        assert_eq!(last.end, u64::MAX);
    }

    #[test]
    fn position_and_interval_containment() {
        let region = GenomicRegion::new("chr1", 100, 200).unwrap();
        assert!(region.intersect_position(100));
        assert!(region.intersect_position(200));
        assert!(!region.intersect_position(201));
        assert!(region.contains_interval(120, 180));
        assert!(!region.contains_interval(90, 180));
    }
}
