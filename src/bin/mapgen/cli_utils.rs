use hexmapper::errors::{HexMapError, HexMapResult};

/// Generic parser for delimited strings that return tuples
pub fn parse_delimited<T, const N: usize>(
    input: &str,
    delimiter: char,
    type_name: &str,
    parser: impl Fn(&str) -> Result<T, std::num::ParseIntError>,
) -> HexMapResult<[T; N]>
where
    T: Copy + Default,
{
    let parts: Vec<&str> = input.split(delimiter).collect();
    if parts.len() != N {
        return Err(HexMapError::InvalidConfig {
            reason: format!(
                "Invalid {type_name} format '{input}'. Expected {N} {delimiter}-separated values"
            ),
        });
    }

    let mut result = [T::default(); N];
    for (i, part) in parts.iter().enumerate() {
        result[i] = parser(part.trim()).map_err(|_| HexMapError::InvalidConfig {
            reason: format!("Invalid {type_name} value: '{part}'"),
        })?;
    }

    Ok(result)
}

/// Parse size string "WIDTHxHEIGHT" with validation
pub fn parse_size(size_str: &str) -> HexMapResult<(u32, u32)> {
    let [width, height] = parse_delimited::<u32, 2>(size_str, 'x', "size", |s| s.parse())?;

    if width == 0 || height == 0 {
        return Err(HexMapError::InvalidConfig {
            reason: "Width and height must be greater than 0".to_string(),
        });
    }

    if width > 512 || height > 512 {
        return Err(HexMapError::InvalidConfig {
            reason: "Width and height must not exceed 512".to_string(),
        });
    }

    Ok((width, height))
}

/// Parse river length string "MIN,MAX" with validation
pub fn parse_length_range(range_str: &str) -> HexMapResult<(u32, u32)> {
    let [min, max] = parse_delimited::<u32, 2>(range_str, ',', "river length", |s| s.parse())?;

    if min > max {
        return Err(HexMapError::InvalidConfig {
            reason: "Minimum river length must be less than or equal to maximum".to_string(),
        });
    }

    Ok((min, max))
}
