//! Files in the SDPA sparse format, as read and written by CSDP.

use crate::Error;
use ndarray::Array2;
use sprs::TriMat;
use std::fmt::Display;
use std::fs::File;
use std::io;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::result::Result;
use std::str::FromStr;

// A line in a .sdpa format
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SdpaCoeff {
    pub mat: usize,
    pub block: usize,
    pub i: usize,
    pub j: usize,
    pub val: f64,
}

impl FromStr for SdpaCoeff {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut iter = s.split_whitespace();
        let mut next = || {
            iter.next()
                .ok_or_else(|| Error::Parse(format!("Less than 5 elements in {s:?}")))
        };
        let result = SdpaCoeff {
            mat: next()?.parse()?,
            block: next()?.parse()?,
            i: next()?.parse()?,
            j: next()?.parse()?,
            val: next()?.parse()?,
        };
        if iter.next().is_some() {
            return Err(Error::Parse(format!("More than 5 elements in {s:?}")));
        };
        Ok(result)
    }
}

impl Display for SdpaCoeff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.mat, self.block, self.i, self.j, self.val
        )
    }
}

impl SdpaCoeff {
    fn indices(&self) -> (usize, usize, usize, usize) {
        (self.mat, self.block, self.i, self.j)
    }
}

fn parse_line<T: FromStr>(line: Option<String>, what: &str) -> Result<Vec<T>, Error>
where
    Error: From<T::Err>,
{
    let line = line.ok_or_else(|| Error::Parse(format!("Missing {what}")))?;
    line.split_whitespace()
        .map(|x| x.parse().map_err(Error::from))
        .collect()
}

fn significant_lines(path: &Path) -> Result<impl Iterator<Item = io::Result<String>>, Error> {
    let buf = BufReader::new(File::open(path)?);
    Ok(buf.lines().filter(|line| match line {
        Ok(l) => {
            let l = l.trim_start();
            !l.starts_with('*') && !l.starts_with('"') && !l.is_empty()
        }
        Err(_) => true,
    }))
}

// SDPA format for problems
// 1. dimension ( =b.len() )
// 2. n_blocks ( =block_sizes.len() )
// 3. block_sizes of length nblock
// 4. b of length dim
// 5+. list of coefficients
#[derive(Debug, Clone, PartialEq)]
pub struct SdpaProblem {
    pub block_sizes: Vec<i32>,
    pub b: Vec<f64>,
    pub coeffs: Vec<SdpaCoeff>,
}

impl SdpaProblem {
    pub fn new(block_sizes: Vec<i32>, b: Vec<f64>, mut coeffs: Vec<SdpaCoeff>) -> Self {
        sum_duplicates(&mut coeffs);
        Self {
            block_sizes,
            b,
            coeffs,
        }
    }
    /// Number of equality constraints.
    pub fn dim(&self) -> usize {
        self.b.len()
    }
    pub fn write(&self, path: &Path) -> Result<(), io::Error> {
        let mut w = BufWriter::new(File::create(path)?);
        writeln!(w, "{}", self.b.len())?;
        writeln!(w, "{}", self.block_sizes.len())?;
        for i in &self.block_sizes {
            write!(w, "{} ", i)?;
        }
        writeln!(w)?;
        for x in &self.b {
            write!(w, "{} ", x)?;
        }
        writeln!(w)?;
        for coeff in &self.coeffs {
            writeln!(w, "{}", coeff)?;
        }
        w.flush()
    }
    pub fn load(path: &Path) -> Result<Self, Error> {
        let mut lines = significant_lines(path)?;
        let mut next = || lines.next().transpose();
        let dim: Vec<usize> = parse_line(next()?, "dimension")?;
        let nblock: Vec<usize> = parse_line(next()?, "number of blocks")?;
        let block_sizes: Vec<i32> = parse_line(next()?, "block sizes")?;
        if nblock.first() != Some(&block_sizes.len()) {
            return Err(Error::Parse(format!(
                "{} block sizes for {:?} blocks",
                block_sizes.len(),
                nblock
            )));
        }
        let b: Vec<f64> = parse_line(next()?, "right-hand side")?;
        if dim.first() != Some(&b.len()) {
            return Err(Error::Parse(format!(
                "right-hand side of length {} for dimension {:?}",
                b.len(),
                dim
            )));
        }
        let mut coeffs: Vec<SdpaCoeff> = Vec::new();
        while let Some(line) = next()? {
            coeffs.push(line.parse()?)
        }
        Ok(SdpaProblem {
            block_sizes,
            b,
            coeffs,
        })
    }
}

// SDPA format for solutions (as given by csdp)
// 1. vector y
// 2+. list of coefficients for Z and X
// matrix 1: Z, matrix 2: X
#[derive(Debug, Clone, PartialEq)]
pub struct SdpaSolution {
    pub y: Vec<f64>,
    pub coeffs: Vec<SdpaCoeff>,
}

impl SdpaSolution {
    pub fn write(&self, path: &Path) -> Result<(), io::Error> {
        let mut w = BufWriter::new(File::create(path)?);
        for v in &self.y {
            write!(w, "{} ", v)?;
        }
        writeln!(w)?;
        for coeff in &self.coeffs {
            writeln!(w, "{}", coeff)?;
        }
        w.flush()
    }
    pub fn load(path: &Path) -> Result<Self, Error> {
        let mut lines = significant_lines(path)?;
        let y: Vec<f64> = parse_line(lines.next().transpose()?, "dual vector")?;
        let mut coeffs: Vec<SdpaCoeff> = Vec::new();
        for line in lines {
            coeffs.push(line?.parse()?)
        }
        Ok(SdpaSolution { y, coeffs })
    }
    /// Dense symmetric block `block` of matrix `mat` (1 for Z, 2 for X).
    pub fn block(&self, mat: usize, block: usize, size: usize) -> Array2<f64> {
        let mut tri_mat = TriMat::new((size, size));
        for c in &self.coeffs {
            if c.mat == mat && c.block == block {
                tri_mat.add_triplet(c.i - 1, c.j - 1, c.val);
                // If the value is not on the diagonal, add the symmetric coeff
                if c.i != c.j {
                    tri_mat.add_triplet(c.j - 1, c.i - 1, c.val);
                }
            }
        }
        let mut res = Array2::zeros((size, size));
        for (&v, (i, j)) in tri_mat.triplet_iter() {
            res[(i, j)] += v
        }
        res
    }
    /// The primal matrix X of a one-block problem.
    pub fn primal_matrix(&self, size: usize) -> Array2<f64> {
        self.block(2, 1, size)
    }
}

fn sum_duplicates(coeffs: &mut Vec<SdpaCoeff>) {
    if coeffs.len() >= 2 {
        coeffs.sort_by_key(SdpaCoeff::indices);
        let mut write = 0;
        for read in 1..coeffs.len() {
            if coeffs[read].indices() == coeffs[write].indices() {
                coeffs[write].val += coeffs[read].val
            } else {
                write += 1;
                coeffs.swap(write, read);
            }
        }
        coeffs.truncate(write + 1)
    }
}

/// Add `scale` times the identity on every block to matrix `matrix_number`.
pub(crate) fn push_identities(
    coeffs: &mut Vec<SdpaCoeff>,
    matrix_number: usize,
    block_sizes: &[i32],
    scale: f64,
) {
    for (block, &blocksize) in block_sizes.iter().enumerate() {
        for i in 0..blocksize.unsigned_abs() as usize {
            coeffs.push(SdpaCoeff {
                mat: matrix_number,
                block: block + 1,
                i: i + 1,
                j: i + 1,
                val: scale,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_coeff() {
        let c: SdpaCoeff = "2 1 1 3 -0.5".parse().unwrap();
        assert_eq!((c.mat, c.block, c.i, c.j, c.val), (2, 1, 1, 3, -0.5));
        assert_eq!(format!("{c}"), "2 1 1 3 -0.5");
        assert!(matches!("2 1 1 3".parse::<SdpaCoeff>(), Err(Error::Parse(_))));
        assert!(matches!("2 1 1 3 1 1".parse::<SdpaCoeff>(), Err(Error::Parse(_))));
        assert!(matches!("a 1 1 3 1".parse::<SdpaCoeff>(), Err(Error::Parse(_))));
    }

    #[test]
    fn duplicates_are_summed() {
        let c = |mat, i, j, val| SdpaCoeff {
            mat,
            block: 1,
            i,
            j,
            val,
        };
        let pb = SdpaProblem::new(
            vec![2],
            vec![1.],
            vec![c(1, 1, 2, 1.), c(0, 1, 1, -1.), c(1, 1, 2, 0.5)],
        );
        assert_eq!(pb.coeffs, vec![c(0, 1, 1, -1.), c(1, 1, 2, 1.5)]);
    }

    #[test]
    fn problem_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pb.sdpa");
        let mut coeffs = vec![SdpaCoeff {
            mat: 1,
            block: 1,
            i: 1,
            j: 1,
            val: 1.,
        }];
        push_identities(&mut coeffs, 0, &[2], -1.);
        let pb = SdpaProblem::new(vec![2], vec![3.], coeffs);
        pb.write(&path).unwrap();
        assert_eq!(SdpaProblem::load(&path).unwrap(), pb);
    }

    #[test]
    fn load_skips_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pb.sdpa");
        std::fs::write(
            &path,
            "* a comment\n\"title\n1\n1\n2\n1.0\n0 1 1 1 -1\n\n1 1 1 2 1\n",
        )
        .unwrap();
        let pb = SdpaProblem::load(&path).unwrap();
        assert_eq!(pb.block_sizes, vec![2]);
        assert_eq!(pb.coeffs.len(), 2);
        std::fs::write(&path, "2\n1\n2\n1.0\n").unwrap();
        assert!(matches!(SdpaProblem::load(&path), Err(Error::Parse(_))));
    }

    #[test]
    fn solution_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sol");
        std::fs::write(&path, "1.5 -2\n1 1 1 1 0.5\n2 1 1 1 2\n2 1 1 2 -1\n2 1 2 2 1\n").unwrap();
        let sol = SdpaSolution::load(&path).unwrap();
        assert_eq!(sol.y, vec![1.5, -2.]);
        let x = sol.primal_matrix(2);
        assert_eq!(x, ndarray::arr2(&[[2., -1.], [-1., 1.]]));
        assert_eq!(sol.block(1, 1, 2)[(0, 0)], 0.5);
        sol.write(&path).unwrap();
        assert_eq!(SdpaSolution::load(&path).unwrap(), sol);
    }
}
