//! Balancing algorithm: minimal positive integer coefficients by null space.
//!
//! Atom conservation over `n` terms is a homogeneous system `A·x = 0` with
//! one row per element and one column per term (product columns negated).
//! We row-reduce `A` exactly with fraction-free Gauss–Jordan elimination,
//! keeping each row in lowest integer terms, then read off the null space.
//!
//! A well-formed reaction has a one-dimensional null space whose basis
//! vector can be scaled to be all-positive. Anything else is a
//! [`BalanceError`]; callers building content wrap it into a configuration
//! error rather than presenting a half-valid equation.
//!
//! ```
//! use bce_logic::balancer::solve;
//! use bce_logic::molecule::{H2, N2, NH3};
//!
//! let coefficients = solve(&[&N2, &H2], &[&NH3]).unwrap();
//! assert_eq!(coefficients, vec![1, 3, 2]);
//! ```

use crate::elements::Element;
use crate::equation::Equation;
use crate::error::BalanceError;
use crate::molecule::Molecule;

/// Greatest common divisor; `gcd(0, n) == n`.
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

fn lcm(a: i64, b: i64) -> Result<i64, BalanceError> {
    let (a, b) = (a.unsigned_abs(), b.unsigned_abs());
    if a == 0 || b == 0 {
        return Ok(0);
    }
    let l = (a / gcd(a, b))
        .checked_mul(b)
        .ok_or(BalanceError::Overflow)?;
    i64::try_from(l).map_err(|_| BalanceError::Overflow)
}

/// Distinct elements across both sides, in first-appearance order.
fn distinct_elements(reactants: &[&Molecule], products: &[&Molecule]) -> Vec<Element> {
    let mut elements = Vec::new();
    for m in reactants.iter().chain(products.iter()) {
        for &atom in m.atoms {
            if !elements.contains(&atom) {
                elements.push(atom);
            }
        }
    }
    elements
}

/// One row per element, one column per term; product counts negated.
fn conservation_matrix(reactants: &[&Molecule], products: &[&Molecule]) -> Vec<Vec<i64>> {
    distinct_elements(reactants, products)
        .into_iter()
        .map(|e| {
            reactants
                .iter()
                .map(|m| m.count_of(e) as i64)
                .chain(products.iter().map(|m| -(m.count_of(e) as i64)))
                .collect()
        })
        .collect()
}

/// Divide a row by the gcd of its entries.
fn normalize_row(row: &mut [i64]) {
    let g = row.iter().fold(0u64, |acc, &v| gcd(acc, v.unsigned_abs()));
    if g > 1 {
        for v in row.iter_mut() {
            *v /= g as i64;
        }
    }
}

/// Fraction-free Gauss–Jordan elimination.
///
/// Returns the nonzero rows and their pivot columns. Every pivot column is
/// zero in all rows except its own.
fn row_reduce(
    mut m: Vec<Vec<i64>>,
    cols: usize,
) -> Result<(Vec<Vec<i64>>, Vec<usize>), BalanceError> {
    let mut pivots = Vec::new();
    let mut rank = 0;

    for col in 0..cols {
        if rank == m.len() {
            break;
        }
        let Some(found) = (rank..m.len()).find(|&r| m[r][col] != 0) else {
            continue;
        };
        m.swap(rank, found);
        normalize_row(&mut m[rank]);

        let pivot_row = m[rank].clone();
        let p = pivot_row[col];
        for (r, row) in m.iter_mut().enumerate() {
            let f = row[col];
            if r == rank || f == 0 {
                continue;
            }
            for (c, value) in row.iter_mut().enumerate() {
                let scaled = value.checked_mul(p).ok_or(BalanceError::Overflow)?;
                let sub = pivot_row[c].checked_mul(f).ok_or(BalanceError::Overflow)?;
                *value = scaled.checked_sub(sub).ok_or(BalanceError::Overflow)?;
            }
            normalize_row(row);
        }

        pivots.push(col);
        rank += 1;
    }

    m.truncate(rank);
    Ok((m, pivots))
}

/// Minimal all-positive integer coefficients for the given molecules,
/// reactants first.
pub fn solve(reactants: &[&Molecule], products: &[&Molecule]) -> Result<Vec<u32>, BalanceError> {
    if reactants.is_empty() {
        return Err(BalanceError::EmptySide("reactants"));
    }
    if products.is_empty() {
        return Err(BalanceError::EmptySide("products"));
    }

    let cols = reactants.len() + products.len();
    let (rows, pivots) = row_reduce(conservation_matrix(reactants, products), cols)?;

    match cols - pivots.len() {
        0 => return Err(BalanceError::NoSolution),
        1 => {}
        dimension => return Err(BalanceError::NotUnique { dimension }),
    }
    let free = (0..cols)
        .find(|c| !pivots.contains(c))
        .ok_or(BalanceError::NoSolution)?;

    // Each row reads a·x[pivot] + b·x[free] = 0. Choosing x[free] as the lcm
    // of the pivot entries keeps every x[pivot] integral.
    let mut scale = 1i64;
    for (row, &p) in rows.iter().zip(&pivots) {
        scale = lcm(scale, row[p])?;
    }
    let mut x = vec![0i64; cols];
    x[free] = scale;
    for (row, &p) in rows.iter().zip(&pivots) {
        x[p] = row[free]
            .checked_mul(scale / row[p])
            .and_then(|v| v.checked_neg())
            .ok_or(BalanceError::Overflow)?;
    }

    let g = x.iter().fold(0u64, |acc, &v| gcd(acc, v.unsigned_abs()));
    if g > 1 {
        for v in x.iter_mut() {
            *v /= g as i64;
        }
    }
    if x.iter().all(|&v| v <= 0) {
        for v in x.iter_mut() {
            *v = -*v;
        }
    }
    if x.iter().any(|&v| v <= 0) {
        return Err(BalanceError::NonPositive { coefficients: x });
    }

    x.into_iter()
        .map(|v| u32::try_from(v).map_err(|_| BalanceError::Overflow))
        .collect()
}

/// Run [`solve`] on an equation's molecules.
pub fn minimal_coefficients(equation: &Equation) -> Result<Vec<u32>, BalanceError> {
    let reactants: Vec<&Molecule> = equation.reactants().iter().map(|t| t.molecule()).collect();
    let products: Vec<&Molecule> = equation.products().iter().map(|t| t.molecule()).collect();
    solve(&reactants, &products)
}

/// True when the coefficient/molecule pairs conserve every element.
pub fn conserves(reactants: &[(u32, &Molecule)], products: &[(u32, &Molecule)]) -> bool {
    let r: Vec<&Molecule> = reactants.iter().map(|(_, m)| *m).collect();
    let p: Vec<&Molecule> = products.iter().map(|(_, m)| *m).collect();
    let total = |side: &[(u32, &Molecule)], e: Element| -> u64 {
        side.iter()
            .map(|(c, m)| *c as u64 * m.count_of(e) as u64)
            .sum()
    };
    distinct_elements(&r, &p)
        .into_iter()
        .all(|e| total(reactants, e) == total(products, e))
}
