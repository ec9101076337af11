use nalgebra::{linalg::LU, DMatrix, DVector, Dyn};

use crate::{ActivityIdx, Error, FlowIdx, Inventory, Key, Method};

/// A solved inventory system: one demand, one characterization method.
///
/// The technosphere matrix `T` has each activity's net production on its
/// diagonal and its technosphere inputs, negated, off the diagonal. Solving
/// `T x = f` for a demand `f` (in units of reference product) gives the
/// activity levels `x`. Both `T` and `Tᵀ` are factorized once here, so every
/// query made during a traversal is a back-substitution or a lookup.
pub struct Lca<'a> {
    inventory: &'a Inventory,
    method: &'a Method,
    demand: Vec<(ActivityIdx, f64)>,
    technosphere: DMatrix<f64>,
    lu: LU<f64, Dyn, Dyn>,
    supply: DVector<f64>,
    /// score per unit of activity level, from that activity's own flows only.
    characterized_biosphere: DVector<f64>,
    /// score per unit of reference product, including everything upstream (`T⁻ᵀ c`).
    cumulative_per_unit: DVector<f64>,
    score: f64,
}

impl<'a> Lca<'a> {
    /// Validate `demand`, factorize the technosphere and solve the system.
    /// Demand amounts are in units of each activity's reference product,
    /// with the same sign convention as production amounts.
    pub fn new(inventory: &'a Inventory, demand: &[(Key, f64)], method: &str) -> Result<Self, Error> {
        if demand.is_empty() {
            return Err(Error::EmptyDemand);
        }
        let demand = demand
            .iter()
            .map(|(key, amount)| {
                inventory
                    .activity_index(key)
                    .map(|idx| (idx, *amount))
                    .ok_or_else(|| Error::UnknownActivity(key.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let method = inventory
            .method(method)
            .ok_or_else(|| Error::UnknownMethod(method.to_owned()))?;

        let technosphere = technosphere_matrix(inventory);
        let lu = technosphere.clone().lu();
        if !lu.is_invertible() {
            return Err(Error::SingularTechnosphere);
        }

        let characterized_biosphere = characterized_biosphere(inventory, method);
        let cumulative_per_unit = technosphere
            .transpose()
            .lu()
            .solve(&characterized_biosphere)
            .filter(all_finite)
            .ok_or(Error::SingularTechnosphere)?;

        let mut lca = Self {
            inventory,
            method,
            demand,
            technosphere,
            lu,
            supply: DVector::zeros(inventory.num_activities()),
            characterized_biosphere,
            cumulative_per_unit,
            score: 0.0,
        };
        lca.supply = lca.solve(&lca.demand)?;
        lca.score = lca.characterized_biosphere.dot(&lca.supply);

        log::debug!(
            "solved system of {} activities for {} demanded products; score = {}",
            inventory.num_activities(),
            lca.demand.len(),
            lca.score,
        );
        Ok(lca)
    }

    /// Activity levels needed to satisfy `demand`, reusing the cached factorization.
    pub fn solve(&self, demand: &[(ActivityIdx, f64)]) -> Result<DVector<f64>, Error> {
        let mut rhs = DVector::zeros(self.inventory.num_activities());
        for (idx, amount) in demand {
            rhs[idx.index()] += amount;
        }
        self.lu
            .solve(&rhs)
            .filter(all_finite)
            .ok_or(Error::SingularTechnosphere)
    }

    /// Cumulative score of supplying `amount` units of `activity`'s reference product.
    #[inline]
    pub fn marginal_score(&self, activity: ActivityIdx, amount: f64) -> f64 {
        amount * self.cumulative_per_unit[activity.index()]
    }

    /// Score of `activity`'s own elementary flows, per unit of activity level.
    #[inline]
    pub fn unit_direct_score(&self, activity: ActivityIdx) -> f64 {
        self.characterized_biosphere[activity.index()]
    }

    /// Characterization factor of `flow` under this system's method.
    #[inline]
    pub fn characterize(&self, flow: FlowIdx) -> f64 {
        self.method.factor(flow)
    }

    #[inline]
    pub fn production_amount(&self, activity: ActivityIdx) -> f64 {
        self.inventory.activity(activity).production
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    /// Activity level of `activity` in the solved system.
    pub fn supply(&self, activity: ActivityIdx) -> f64 {
        self.supply[activity.index()]
    }

    pub fn supply_array(&self) -> &[f64] {
        self.supply.as_slice()
    }

    pub fn technosphere_matrix(&self) -> &DMatrix<f64> {
        &self.technosphere
    }

    /// Demanded activities and amounts, in the order they were requested.
    pub fn demand(&self) -> &[(ActivityIdx, f64)] {
        &self.demand
    }

    pub fn inventory(&self) -> &'a Inventory {
        self.inventory
    }

    pub fn method(&self) -> &'a Method {
        self.method
    }

    pub fn activity_index(&self, key: &Key) -> Option<ActivityIdx> {
        self.inventory.activity_index(key)
    }

    pub fn activity_key(&self, activity: ActivityIdx) -> &'a Key {
        &self.inventory.activity(activity).key
    }

    pub fn flow_key(&self, flow: FlowIdx) -> &'a Key {
        &self.inventory.flow(flow).key
    }
}

fn all_finite(v: &DVector<f64>) -> bool {
    v.iter().all(|x| x.is_finite())
}

fn technosphere_matrix(inventory: &Inventory) -> DMatrix<f64> {
    let n = inventory.num_activities();
    let mut matrix = DMatrix::zeros(n, n);
    for (col, activity) in inventory.activities() {
        matrix[(col.index(), col.index())] += activity.production;
        for exc in &activity.technosphere {
            matrix[(exc.input.index(), col.index())] -= exc.amount;
        }
    }
    matrix
}

fn characterized_biosphere(inventory: &Inventory, method: &Method) -> DVector<f64> {
    let mut cb = DVector::zeros(inventory.num_activities());
    for (col, activity) in inventory.activities() {
        cb[col.index()] = activity
            .biosphere
            .iter()
            .map(|exc| exc.amount * method.factor(exc.input))
            .sum();
    }
    cb
}
