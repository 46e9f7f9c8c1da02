use crate::NoiseSource;

// Single-octave 2D Perlin gradient noise; octaves are layered by FractalSampler
pub struct Perlin2D {
    seed: u64,
    perm: [u8; 512], // permutation table, 256 entries duplicated
}

impl Perlin2D {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            perm: permutation_table(seed ^ 0xDEAD_BEEF_CAFE_BABE),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    // Quintic fade 6t^5 - 15t^4 + 10t^3, zero first and second derivative at 0 and 1
    #[inline]
    fn fade(t: f64) -> f64 {
        t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
    }

    #[inline]
    fn lerp(a: f64, b: f64, t: f64) -> f64 {
        a + t * (b - a)
    }

    // Pick one of eight gradient directions from the low hash bits and dot it with (x, y)
    #[inline]
    fn grad(hash: u8, x: f64, y: f64) -> f64 {
        let h = hash & 0x7;
        let (u, v) = if h < 4 { (x, y) } else { (y, x) };
        let u = if h & 1 == 0 { u } else { -u };
        let v = if h & 2 == 0 { v } else { -v };
        u + v * 0.5
    }

    #[inline]
    fn hash(&self, xi: usize, yi: usize) -> u8 {
        self.perm[self.perm[xi] as usize + yi]
    }

    // Raw noise, roughly in [-1, 1]
    fn noise(&self, x: f64, y: f64) -> f64 {
        let (x0, y0) = (x.floor(), y.floor());
        let xi = (x0 as i64 & 255) as usize;
        let yi = (y0 as i64 & 255) as usize;
        let xf = x - x0;
        let yf = y - y0;
        let u = Self::fade(xf);
        let v = Self::fade(yf);

        let aa = self.hash(xi, yi);
        let ab = self.hash(xi, yi + 1);
        let ba = self.hash(xi + 1, yi);
        let bb = self.hash(xi + 1, yi + 1);

        let x1 = Self::lerp(Self::grad(aa, xf, yf), Self::grad(ba, xf - 1.0, yf), u);
        let x2 = Self::lerp(
            Self::grad(ab, xf, yf - 1.0),
            Self::grad(bb, xf - 1.0, yf - 1.0),
            u,
        );
        Self::lerp(x1, x2, v)
    }
}

impl NoiseSource for Perlin2D {
    fn eval(&self, x: f64, y: f64) -> f64 {
        ((self.noise(x, y) + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}

// Fisher-Yates shuffle of 0..=255 driven by xorshift64, duplicated to 512
// entries so lookups at index + 1 never need a modulo.
pub(crate) fn permutation_table(mut state: u64) -> [u8; 512] {
    // xorshift gets stuck at zero
    if state == 0 {
        state = 0x9E37_79B9_7F4A_7C15;
    }
    let mut next = || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };

    let mut p: Vec<u8> = (0..=255u8).collect();
    for i in (1..256).rev() {
        let j = (next() % (i as u64 + 1)) as usize;
        p.swap(i, j);
    }

    let mut perm = [0u8; 512];
    for (i, slot) in perm.iter_mut().enumerate() {
        *slot = p[i & 255];
    }
    perm
}
