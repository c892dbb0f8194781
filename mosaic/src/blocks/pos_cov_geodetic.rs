use super::float_or_dnu;

sbf_block! {
    /// Position covariance matrix in the local geodetic frame (block 5906).
    ///
    /// Variances are in m², for latitude, longitude, height and clock bias.
    PosCovGeodetic, number = 5906, len = 56 {
        8 => tow: u32,
        12 => wnc: u16,
        14 => mode: u8,
        15 => error: u8,
        16 => cov_latlat: f32,
        20 => cov_lonlon: f32,
        24 => cov_hgthgt: f32,
        28 => cov_bb: f32,
        32 => cov_latlon: f32,
        36 => cov_lathgt: f32,
        40 => cov_latb: f32,
        44 => cov_lonhgt: f32,
        48 => cov_lonb: f32,
        52 => cov_hb: f32,
    }
}

impl PosCovGeodetic {
    /// Position covariance in east, north, up order, row-major.
    ///
    /// East is longitude and north latitude. Returns `None` if any entry is
    /// marked "do not use".
    pub fn enu_covariance(&self) -> Option<[f64; 9]> {
        let ee = f64::from(float_or_dnu(self.cov_lonlon)?);
        let nn = f64::from(float_or_dnu(self.cov_latlat)?);
        let uu = f64::from(float_or_dnu(self.cov_hgthgt)?);
        let en = f64::from(float_or_dnu(self.cov_latlon)?);
        let eu = f64::from(float_or_dnu(self.cov_lonhgt)?);
        let nu = f64::from(float_or_dnu(self.cov_lathgt)?);
        Some([ee, en, eu, en, nn, nu, eu, nu, uu])
    }

    /// Standard deviations of latitude, longitude and height (m).
    pub fn std_devs(&self) -> Option<[f64; 3]> {
        Some([
            f64::from(float_or_dnu(self.cov_latlat)?).sqrt(),
            f64::from(float_or_dnu(self.cov_lonlon)?).sqrt(),
            f64::from(float_or_dnu(self.cov_hgthgt)?).sqrt(),
        ])
    }
}
